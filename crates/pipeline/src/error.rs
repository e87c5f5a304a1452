//! Pipeline error type: every stage failure funnels through here.

use apkforge_core::error::{InjectError, MaterializeError};
use apkforge_gha::GhaError;
use apkforge_toolchain::ToolchainError;

/// Any failure of a pipeline stage. Caught at the job task boundary,
/// classified via [`kind`](Self::kind), and recorded into the job's
/// error field; nothing escapes to affect other jobs.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    #[error(transparent)]
    Inject(#[from] InjectError),

    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    #[error(transparent)]
    Gha(#[from] GhaError),

    /// Task-level failures (join errors, missing store entries).
    #[error("Internal pipeline error: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Stable classification recorded into `Job.error.kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Materialize(_) => "materialization_error",
            Self::Inject(_) => "injection_error",
            Self::Toolchain(e) => match e {
                ToolchainError::Build { .. } => "build_error",
                ToolchainError::ArtifactMissing(_) => "artifact_missing_error",
                ToolchainError::SigningConfiguration(_) => "signing_configuration_error",
                ToolchainError::Sign { .. } => "signing_error",
            },
            Self::Gha(e) => match e {
                GhaError::Dispatch(_) => "dispatch_error",
                GhaError::RunNotFound { .. } => "run_not_found_error",
                GhaError::RunFailed { .. } => "run_failed",
                GhaError::RunTimeout { .. } => "run_timeout_error",
                GhaError::Download(_) => "download_error",
                GhaError::Extraction(_) => "extraction_error",
            },
            Self::Internal(_) => "internal_error",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
