use std::path::PathBuf;

/// Failures of the local build/sign toolchain. All of them are terminal
/// for the job; there is no automatic retry at any stage.
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    /// The external build command failed or timed out. Carries the
    /// captured standard-error output as diagnostics.
    #[error("Build failed: {stderr}")]
    Build { stderr: String },

    /// The build tool reported success but the expected unsigned
    /// artifact is not on disk.
    #[error("Build succeeded but expected artifact is missing: {0}")]
    ArtifactMissing(PathBuf),

    /// No keystore file at the configured path. Raised before the
    /// signer is invoked so a completed build is not wasted on a
    /// misconfigured host.
    #[error("Keystore not found at {0}; mount the keystore and set KEYSTORE_PATH")]
    SigningConfiguration(PathBuf),

    /// The signer process failed or timed out.
    #[error("Signing failed: {stderr}")]
    Sign { stderr: String },
}
