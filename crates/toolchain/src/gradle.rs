//! Gradle build step.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;

use apkforge_core::layout;

use crate::error::ToolchainError;
use crate::process::{run_command, ProcessError};

/// Default build invocation, run from the workspace root.
pub const DEFAULT_BUILD_COMMAND: &str = "./gradlew assembleRelease";

/// Default build timeout: release builds routinely take many minutes.
pub const DEFAULT_BUILD_TIMEOUT_SECS: u64 = 20 * 60;

/// Configuration for the build step.
#[derive(Debug, Clone)]
pub struct GradleConfig {
    /// Shell-style command line, split on whitespace into program + args.
    pub command: String,
    pub timeout: Duration,
}

impl Default for GradleConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_BUILD_COMMAND.to_string(),
            timeout: Duration::from_secs(DEFAULT_BUILD_TIMEOUT_SECS),
        }
    }
}

/// Runs the external build command against a workspace.
pub struct GradleBuilder {
    config: GradleConfig,
}

impl GradleBuilder {
    pub fn new(config: GradleConfig) -> Self {
        Self { config }
    }

    /// Run the build in `workspace` and verify the unsigned APK exists.
    ///
    /// Timeout and non-zero exit both surface as
    /// [`ToolchainError::Build`] carrying the captured stderr. A build
    /// that exits zero without producing the expected unsigned artifact
    /// is [`ToolchainError::ArtifactMissing`].
    pub async fn build(&self, workspace: &Path) -> Result<PathBuf, ToolchainError> {
        let mut parts = self.config.command.split_whitespace();
        let program = parts.next().ok_or_else(|| ToolchainError::Build {
            stderr: "build command is empty".to_string(),
        })?;

        let mut cmd = Command::new(program);
        cmd.args(parts).current_dir(workspace);

        tracing::info!(
            workspace = %workspace.display(),
            command = %self.config.command,
            "Starting build",
        );

        let output = match run_command(&mut cmd, self.config.timeout).await {
            Ok(output) => output,
            Err(ProcessError::Timeout { elapsed_ms }) => {
                return Err(ToolchainError::Build {
                    stderr: format!("build timed out after {elapsed_ms}ms"),
                })
            }
            Err(ProcessError::Io(e)) => {
                return Err(ToolchainError::Build {
                    stderr: format!("failed to spawn build command: {e}"),
                })
            }
        };

        if output.exit_code != 0 {
            return Err(ToolchainError::Build {
                stderr: output.stderr,
            });
        }

        tracing::info!(
            workspace = %workspace.display(),
            duration_ms = output.duration_ms,
            "Build finished",
        );

        let unsigned = layout::unsigned_apk(workspace);
        if !unsigned.is_file() {
            return Err(ToolchainError::ArtifactMissing(unsigned));
        }
        Ok(unsigned)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
