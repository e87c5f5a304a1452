//! Remote CI driver: dispatch-then-poll build execution.
//!
//! The trigger API does not return a run id synchronously, so the driver
//! correlates its dispatch to a concrete run by polling the run listing
//! with a tolerance window, then polls that run to completion and
//! retrieves whatever artifact it produced.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Utc;

use apkforge_core::config::BuildConfig;
use apkforge_core::layout::{archive_name, artifact_name, download_ref};
use apkforge_core::types::Timestamp;
use apkforge_store::{JobStatus, JobStore, JobUpdate};

use crate::api::GhaApi;
use crate::error::GhaError;
use crate::extract::{extract_archive, find_file_with_extension};
use crate::types::{DispatchInputs, WorkflowRun};

/// Installable-artifact extension searched for inside CI archives.
const APK_EXTENSION: &str = "apk";

/// Message recorded when a successful run produced no artifacts.
const NO_ARTIFACT_MESSAGE: &str = "workflow run produced no artifacts";

/// Message recorded when the archive holds no installable artifact.
const NO_APK_MESSAGE: &str =
    "artifact archive contains no .apk file; raw archive kept as the result";

/// Polling windows and intervals for the dispatch-then-poll protocol.
///
/// Dispatch and run listing are eventually consistent on typical CI
/// backends; the discovery tolerance accepts runs created slightly
/// before the locally observed dispatch time.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// How far before the dispatch time a run may have been created and
    /// still be accepted as ours.
    pub discovery_tolerance: chrono::Duration,
    /// Total budget for finding the dispatched run.
    pub discovery_timeout: Duration,
    pub discovery_interval: Duration,
    /// Total budget for the run to reach a terminal status.
    pub completion_timeout: Duration,
    pub completion_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            discovery_tolerance: chrono::Duration::seconds(30),
            discovery_timeout: Duration::from_secs(120),
            discovery_interval: Duration::from_secs(2),
            completion_timeout: Duration::from_secs(20 * 60),
            completion_interval: Duration::from_secs(5),
        }
    }
}

/// Delegates build execution to a GitHub Actions workflow.
///
/// Stage entries (`triggering`, `dispatched`, `running-remote`) are
/// reported to the job store as they begin.
pub struct GhaToolchain {
    api: GhaApi,
    output_dir: PathBuf,
    poll: PollConfig,
}

impl GhaToolchain {
    pub fn new(api: GhaApi, output_dir: PathBuf) -> Self {
        Self {
            api,
            output_dir,
            poll: PollConfig::default(),
        }
    }

    /// Override the polling windows (tests use short budgets).
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Run the full dispatch → discover → poll → retrieve pipeline.
    pub async fn execute(
        &self,
        store: &JobStore,
        job_id: &str,
        config: &BuildConfig,
        workspace: &Path,
    ) -> Result<JobUpdate, GhaError> {
        store
            .advance(job_id, JobStatus::Triggering, JobUpdate::default())
            .await;

        let dispatched_at = Utc::now();
        let inputs = DispatchInputs::from_config(config);
        self.api
            .dispatch_workflow(&inputs)
            .await
            .map_err(|e| GhaError::Dispatch(e.to_string()))?;

        tracing::info!(job_id, "Workflow dispatched");
        store
            .advance(job_id, JobStatus::Dispatched, JobUpdate::default())
            .await;

        let run = self.discover_run(dispatched_at).await?;
        tracing::info!(job_id, run_id = run.id, "Workflow run discovered");
        store
            .advance(
                job_id,
                JobStatus::RemoteRunning,
                JobUpdate {
                    run_id: Some(run.id),
                    ..JobUpdate::default()
                },
            )
            .await;

        let run = self.wait_for_completion(run.id).await?;
        if !run.is_success() {
            // Never silently treat a non-success conclusion as success;
            // the conclusion is recorded verbatim.
            return Err(GhaError::RunFailed {
                conclusion: run.conclusion.unwrap_or_else(|| "unknown".to_string()),
            });
        }

        self.retrieve_artifact(job_id, config, workspace, run.id)
            .await
    }

    // ---- pipeline stages ----

    /// Correlate the dispatch to a concrete run.
    ///
    /// Accepts the oldest run created at or after (dispatch time −
    /// tolerance). Listing failures are retried until the discovery
    /// budget runs out.
    async fn discover_run(&self, dispatched_at: Timestamp) -> Result<WorkflowRun, GhaError> {
        let cutoff = dispatched_at - self.poll.discovery_tolerance;
        let started = Instant::now();

        loop {
            match self.api.list_runs().await {
                Ok(runs) => {
                    if let Some(run) = select_run(&runs, cutoff) {
                        return Ok(run);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Run listing failed, retrying");
                }
            }

            if started.elapsed() >= self.poll.discovery_timeout {
                return Err(GhaError::RunNotFound {
                    waited_secs: started.elapsed().as_secs(),
                });
            }
            tokio::time::sleep(self.poll.discovery_interval).await;
        }
    }

    /// Poll the run at a fixed interval until it reports a terminal
    /// status or the wait budget is exceeded.
    async fn wait_for_completion(&self, run_id: i64) -> Result<WorkflowRun, GhaError> {
        let started = Instant::now();

        loop {
            match self.api.get_run(run_id).await {
                Ok(run) if run.is_completed() => return Ok(run),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(run_id, error = %e, "Run status poll failed, retrying");
                }
            }

            if started.elapsed() >= self.poll.completion_timeout {
                return Err(GhaError::RunTimeout {
                    run_id,
                    waited_secs: started.elapsed().as_secs(),
                });
            }
            tokio::time::sleep(self.poll.completion_interval).await;
        }
    }

    /// Download, persist, and unpack the run's first artifact.
    ///
    /// Absence of an artifact is not an error: some pipelines
    /// intentionally produce none, so the job still completes with an
    /// explanatory message. Likewise an archive without an `.apk` keeps
    /// the raw archive as the downloadable result.
    async fn retrieve_artifact(
        &self,
        job_id: &str,
        config: &BuildConfig,
        workspace: &Path,
        run_id: i64,
    ) -> Result<JobUpdate, GhaError> {
        let artifacts = self
            .api
            .list_artifacts(run_id)
            .await
            .map_err(|e| GhaError::Download(e.to_string()))?;

        let Some(artifact) = artifacts.first() else {
            tracing::info!(job_id, run_id, "Run produced no artifacts");
            return Ok(JobUpdate {
                message: Some(NO_ARTIFACT_MESSAGE.to_string()),
                ..JobUpdate::default()
            });
        };

        let bytes = self
            .api
            .download_artifact(&artifact.archive_download_url)
            .await
            .map_err(|e| GhaError::Download(e.to_string()))?;

        let archive_file = archive_name(job_id);
        let archive_path = self.output_dir.join(&archive_file);
        tokio::fs::write(&archive_path, &bytes)
            .await
            .map_err(|e| GhaError::Download(format!("failed to persist archive: {e}")))?;

        tracing::info!(
            job_id,
            run_id,
            artifact = %artifact.name,
            bytes = bytes.len(),
            "Artifact archive downloaded",
        );

        // Unpack into a job-scoped scratch directory and look for the
        // installable artifact.
        let scratch = workspace.join("ci-artifact");
        let found = {
            let zip = archive_path.clone();
            let dest = scratch.clone();
            tokio::task::spawn_blocking(move || -> Result<Option<PathBuf>, GhaError> {
                extract_archive(&zip, &dest)?;
                Ok(find_file_with_extension(&dest, APK_EXTENSION))
            })
            .await
            .map_err(|e| GhaError::Extraction(e.to_string()))??
        };

        let archive_ref = download_ref(&archive_file);
        match found {
            None => {
                tracing::warn!(job_id, run_id, "Archive contains no .apk file");
                Ok(JobUpdate {
                    archive: Some(archive_ref),
                    message: Some(NO_APK_MESSAGE.to_string()),
                    ..JobUpdate::default()
                })
            }
            Some(apk) => {
                let out_name = artifact_name(&config.package_name, job_id);
                let out_path = self.output_dir.join(&out_name);
                tokio::fs::copy(&apk, &out_path)
                    .await
                    .map_err(|e| GhaError::Extraction(format!("failed to publish apk: {e}")))?;

                tracing::info!(job_id, artifact = %out_path.display(), "Artifact published");
                Ok(JobUpdate {
                    artifact: Some(download_ref(&out_name)),
                    archive: Some(archive_ref),
                    ..JobUpdate::default()
                })
            }
        }
    }
}

/// Pick the run correlated to a dispatch: the oldest run created at or
/// after `cutoff`.
///
/// Older runs belong to earlier dispatches; picking the newest
/// unconditionally would race with dispatches from concurrent jobs.
pub fn select_run(runs: &[WorkflowRun], cutoff: Timestamp) -> Option<WorkflowRun> {
    runs.iter()
        .filter(|run| run.created_at >= cutoff)
        .min_by_key(|run| run.created_at)
        .cloned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
