//! Pipeline configuration loaded from environment variables.
//!
//! All fields have defaults suitable for local development; production
//! deployments override via environment variables (keystore and GitHub
//! credentials are supplied this way, out-of-band of job submissions).

use std::path::PathBuf;

use apkforge_toolchain::gradle::{DEFAULT_BUILD_COMMAND, DEFAULT_BUILD_TIMEOUT_SECS};
use apkforge_toolchain::signer::{DEFAULT_SIGNER_COMMAND, DEFAULT_SIGN_TIMEOUT_SECS};

/// Which toolchain driver executes builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainVariant {
    /// Gradle build + signer on this host.
    Local,
    /// Delegation to a GitHub Actions workflow.
    Gha,
}

/// Remote CI coordinates and credentials.
#[derive(Debug, Clone)]
pub struct GhaSettings {
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub workflow_file: String,
    pub git_ref: String,
    pub token: String,
}

/// Everything the orchestrator needs to run jobs.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Read-only template project copied per job.
    pub template_root: PathBuf,
    /// Parent directory of per-job workspaces.
    pub jobs_root: PathBuf,
    /// Shared output area exposed for download.
    pub output_dir: PathBuf,
    /// Where uploaded icon/Firebase files land.
    pub upload_dir: PathBuf,
    pub toolchain: ToolchainVariant,
    pub build_command: String,
    pub build_timeout_secs: u64,
    pub signer_command: String,
    pub sign_timeout_secs: u64,
    pub keystore_path: PathBuf,
    pub keystore_password: String,
    pub key_alias: String,
    pub gha: GhaSettings,
}

impl PipelineSettings {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                       |
    /// |----------------------|-------------------------------|
    /// | `TEMPLATE_ROOT`      | `./template`                  |
    /// | `JOBS_ROOT`          | `./temp/jobs`                 |
    /// | `OUTPUT_DIR`         | `./uploads/output`            |
    /// | `UPLOAD_DIR`         | `./uploads`                   |
    /// | `TOOLCHAIN`          | `local` (`gha` for remote CI) |
    /// | `BUILD_COMMAND`      | `./gradlew assembleRelease`   |
    /// | `BUILD_TIMEOUT_SECS` | `1200`                        |
    /// | `SIGNER_COMMAND`     | `apksigner`                   |
    /// | `SIGN_TIMEOUT_SECS`  | `300`                         |
    /// | `KEYSTORE_PATH`      | `/keystore/keystore.jks`      |
    /// | `KEYSTORE_PASS`      | (empty)                       |
    /// | `KEY_ALIAS`          | `myalias`                     |
    /// | `GITHUB_API_BASE`    | `https://api.github.com`      |
    /// | `REPO_OWNER`         | (empty)                       |
    /// | `REPO_NAME`          | (empty)                       |
    /// | `WORKFLOW_FILE`      | `build.yml`                   |
    /// | `WORKFLOW_REF`       | `main`                        |
    /// | `GITHUB_TOKEN`       | (empty)                       |
    pub fn from_env() -> Self {
        let toolchain = match env_or("TOOLCHAIN", "local").as_str() {
            "gha" | "remote" => ToolchainVariant::Gha,
            _ => ToolchainVariant::Local,
        };

        Self {
            template_root: PathBuf::from(env_or("TEMPLATE_ROOT", "./template")),
            jobs_root: PathBuf::from(env_or("JOBS_ROOT", "./temp/jobs")),
            output_dir: PathBuf::from(env_or("OUTPUT_DIR", "./uploads/output")),
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "./uploads")),
            toolchain,
            build_command: env_or("BUILD_COMMAND", DEFAULT_BUILD_COMMAND),
            build_timeout_secs: env_u64("BUILD_TIMEOUT_SECS", DEFAULT_BUILD_TIMEOUT_SECS),
            signer_command: env_or("SIGNER_COMMAND", DEFAULT_SIGNER_COMMAND),
            sign_timeout_secs: env_u64("SIGN_TIMEOUT_SECS", DEFAULT_SIGN_TIMEOUT_SECS),
            keystore_path: PathBuf::from(env_or("KEYSTORE_PATH", "/keystore/keystore.jks")),
            keystore_password: env_or("KEYSTORE_PASS", ""),
            key_alias: env_or("KEY_ALIAS", "myalias"),
            gha: GhaSettings {
                api_base: env_or("GITHUB_API_BASE", "https://api.github.com"),
                owner: env_or("REPO_OWNER", ""),
                repo: env_or("REPO_NAME", ""),
                workflow_file: env_or("WORKFLOW_FILE", "build.yml"),
                git_ref: env_or("WORKFLOW_REF", "main"),
                token: env_or("GITHUB_TOKEN", ""),
            },
        }
    }

    /// Create the writable directories the pipeline needs.
    ///
    /// The template root is deliberately not created: a missing template
    /// must surface as a materialization failure, not an empty build.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.jobs_root)?;
        std::fs::create_dir_all(&self.output_dir)?;
        std::fs::create_dir_all(&self.upload_dir)?;
        Ok(())
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dirs_creates_writable_areas() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = PipelineSettings {
            template_root: tmp.path().join("template"),
            jobs_root: tmp.path().join("temp/jobs"),
            output_dir: tmp.path().join("uploads/output"),
            upload_dir: tmp.path().join("uploads"),
            toolchain: ToolchainVariant::Local,
            build_command: DEFAULT_BUILD_COMMAND.into(),
            build_timeout_secs: DEFAULT_BUILD_TIMEOUT_SECS,
            signer_command: DEFAULT_SIGNER_COMMAND.into(),
            sign_timeout_secs: DEFAULT_SIGN_TIMEOUT_SECS,
            keystore_path: tmp.path().join("keystore.jks"),
            keystore_password: String::new(),
            key_alias: "myalias".into(),
            gha: GhaSettings {
                api_base: "https://api.github.com".into(),
                owner: String::new(),
                repo: String::new(),
                workflow_file: "build.yml".into(),
                git_ref: "main".into(),
                token: String::new(),
            },
        };

        settings.ensure_dirs().unwrap();
        assert!(settings.jobs_root.is_dir());
        assert!(settings.output_dir.is_dir());
        assert!(settings.upload_dir.is_dir());
        // Missing template stays missing.
        assert!(!settings.template_root.exists());
    }
}
