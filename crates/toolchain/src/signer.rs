//! APK signing step.
//!
//! The keystore is provisioned out-of-band (mounted file + environment
//! variables). The signer checks for it before invoking the signing tool
//! so a completed multi-minute build is not wasted on a host that cannot
//! sign anyway.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;

use crate::error::ToolchainError;
use crate::process::{run_command, ProcessError};

/// Default signing tool from the Android build tools.
pub const DEFAULT_SIGNER_COMMAND: &str = "apksigner";

/// Default signing timeout.
pub const DEFAULT_SIGN_TIMEOUT_SECS: u64 = 5 * 60;

/// Keystore location and credentials.
#[derive(Debug, Clone)]
pub struct KeystoreConfig {
    pub path: PathBuf,
    pub password: String,
    pub alias: String,
}

/// Runs the external signing tool.
pub struct ApkSigner {
    command: String,
    keystore: KeystoreConfig,
    timeout: Duration,
}

impl ApkSigner {
    pub fn new(command: String, keystore: KeystoreConfig, timeout: Duration) -> Self {
        Self {
            command,
            keystore,
            timeout,
        }
    }

    /// Sign `unsigned` into `out`.
    ///
    /// Fails fast with [`ToolchainError::SigningConfiguration`] when the
    /// keystore file is absent, before any process is spawned.
    pub async fn sign(&self, unsigned: &Path, out: &Path) -> Result<(), ToolchainError> {
        if !self.keystore.path.is_file() {
            return Err(ToolchainError::SigningConfiguration(
                self.keystore.path.clone(),
            ));
        }

        let mut cmd = Command::new(&self.command);
        cmd.arg("sign")
            .arg("--ks")
            .arg(&self.keystore.path)
            .arg("--ks-key-alias")
            .arg(&self.keystore.alias)
            .arg("--ks-pass")
            .arg(format!("pass:{}", self.keystore.password))
            .arg("--out")
            .arg(out)
            .arg(unsigned);

        tracing::info!(
            unsigned = %unsigned.display(),
            out = %out.display(),
            "Signing artifact",
        );

        let output = match run_command(&mut cmd, self.timeout).await {
            Ok(output) => output,
            Err(ProcessError::Timeout { elapsed_ms }) => {
                return Err(ToolchainError::Sign {
                    stderr: format!("signer timed out after {elapsed_ms}ms"),
                })
            }
            Err(ProcessError::Io(e)) => {
                return Err(ToolchainError::Sign {
                    stderr: format!("failed to spawn signer: {e}"),
                })
            }
        };

        if output.exit_code != 0 {
            return Err(ToolchainError::Sign {
                stderr: output.stderr,
            });
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
