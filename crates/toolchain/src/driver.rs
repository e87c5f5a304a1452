//! Local toolchain driver: build, sign, publish.

use std::path::{Path, PathBuf};

use apkforge_core::config::BuildConfig;
use apkforge_core::layout::{artifact_name, download_ref};
use apkforge_store::{JobStatus, JobStore, JobUpdate};

use crate::error::ToolchainError;
use crate::gradle::GradleBuilder;
use crate::signer::ApkSigner;

/// Drives the local build and signing tools for one job at a time.
///
/// Stage entries (`building`, `signing`) are reported to the job store
/// as they begin, so status polls reflect where a job currently is.
pub struct LocalToolchain {
    gradle: GradleBuilder,
    signer: ApkSigner,
    output_dir: PathBuf,
}

impl LocalToolchain {
    pub fn new(gradle: GradleBuilder, signer: ApkSigner, output_dir: PathBuf) -> Self {
        Self {
            gradle,
            signer,
            output_dir,
        }
    }

    /// Build, sign, and publish the artifact for `job_id`.
    ///
    /// On success the returned update carries the download reference to
    /// the signed APK. Every failure is terminal; nothing is retried.
    pub async fn execute(
        &self,
        store: &JobStore,
        job_id: &str,
        config: &BuildConfig,
        workspace: &Path,
    ) -> Result<JobUpdate, ToolchainError> {
        store
            .advance(job_id, JobStatus::Building, JobUpdate::default())
            .await;
        let unsigned = self.gradle.build(workspace).await?;

        store
            .advance(job_id, JobStatus::Signing, JobUpdate::default())
            .await;

        let out_name = artifact_name(&config.package_name, job_id);
        let out_path = self.output_dir.join(&out_name);
        self.signer.sign(&unsigned, &out_path).await?;

        if !out_path.is_file() {
            return Err(ToolchainError::ArtifactMissing(out_path));
        }

        tracing::info!(job_id, artifact = %out_path.display(), "Artifact published");

        Ok(JobUpdate {
            artifact: Some(download_ref(&out_name)),
            ..JobUpdate::default()
        })
    }
}
