//! The orchestrator: one pipeline per submitted job.
//!
//! Submission is fire-and-forget: `submit` records the job and spawns
//! its pipeline task, returning the job handle before any stage runs.
//! Jobs are isolated structurally (one workspace per job id); the only
//! shared mutable structure is the job store. There is no cancellation:
//! once dispatched, a job runs to completion or to one of its timeouts.

use std::sync::Arc;
use std::time::Duration;

use apkforge_core::config::BuildConfig;
use apkforge_core::error::CoreError;
use apkforge_core::inject::inject;
use apkforge_core::materialize::materialize;
use apkforge_gha::{GhaApi, GhaConfig, GhaToolchain};
use apkforge_store::{Job, JobStatus, JobStore, JobUpdate};
use apkforge_toolchain::gradle::{GradleBuilder, GradleConfig};
use apkforge_toolchain::signer::{ApkSigner, KeystoreConfig};
use apkforge_toolchain::LocalToolchain;

use crate::driver::Toolchain;
use crate::error::PipelineError;
use crate::settings::{PipelineSettings, ToolchainVariant};

/// Accepts job submissions and runs each pipeline to a terminal state.
pub struct Orchestrator {
    store: Arc<JobStore>,
    driver: Arc<dyn Toolchain>,
    settings: Arc<PipelineSettings>,
}

impl Orchestrator {
    /// Build the orchestrator with the toolchain variant the settings
    /// select.
    pub fn from_settings(settings: PipelineSettings) -> Self {
        let settings = Arc::new(settings);

        let driver: Arc<dyn Toolchain> = match settings.toolchain {
            ToolchainVariant::Local => {
                let gradle = GradleBuilder::new(GradleConfig {
                    command: settings.build_command.clone(),
                    timeout: Duration::from_secs(settings.build_timeout_secs),
                });
                let signer = ApkSigner::new(
                    settings.signer_command.clone(),
                    KeystoreConfig {
                        path: settings.keystore_path.clone(),
                        password: settings.keystore_password.clone(),
                        alias: settings.key_alias.clone(),
                    },
                    Duration::from_secs(settings.sign_timeout_secs),
                );
                Arc::new(LocalToolchain::new(
                    gradle,
                    signer,
                    settings.output_dir.clone(),
                ))
            }
            ToolchainVariant::Gha => {
                let api = GhaApi::new(GhaConfig {
                    api_base: settings.gha.api_base.clone(),
                    owner: settings.gha.owner.clone(),
                    repo: settings.gha.repo.clone(),
                    workflow_file: settings.gha.workflow_file.clone(),
                    git_ref: settings.gha.git_ref.clone(),
                    token: settings.gha.token.clone(),
                });
                Arc::new(GhaToolchain::new(api, settings.output_dir.clone()))
            }
        };

        Self::with_driver(settings, driver)
    }

    /// Build the orchestrator around an explicit driver (tests inject a
    /// mock toolchain here).
    pub fn with_driver(settings: Arc<PipelineSettings>, driver: Arc<dyn Toolchain>) -> Self {
        Self {
            store: Arc::new(JobStore::new()),
            driver,
            settings,
        }
    }

    /// The job store, shared with the status interface.
    pub fn store(&self) -> Arc<JobStore> {
        Arc::clone(&self.store)
    }

    /// Validate and accept a submission.
    ///
    /// Returns the created job (status `queued`) immediately; the
    /// pipeline runs on its own task.
    pub async fn submit(&self, config: BuildConfig) -> Result<Job, CoreError> {
        config.validate()?;

        let job = self.store.create(config).await;

        let store = Arc::clone(&self.store);
        let driver = Arc::clone(&self.driver);
        let settings = Arc::clone(&self.settings);
        let job_id = job.id.clone();
        tokio::spawn(async move {
            run_job(store, driver, settings, job_id).await;
        });

        Ok(job)
    }
}

/// Drive one job to a terminal state, absorbing every stage failure.
///
/// One job's failure must never affect any other concurrent job: errors
/// are recorded into the job and the task ends.
async fn run_job(
    store: Arc<JobStore>,
    driver: Arc<dyn Toolchain>,
    settings: Arc<PipelineSettings>,
    job_id: String,
) {
    match run_stages(&store, driver.as_ref(), &settings, &job_id).await {
        Ok(update) => {
            store.advance(&job_id, JobStatus::Done, update).await;
            tracing::info!(job_id = %job_id, "Job completed");
        }
        Err(e) => {
            tracing::error!(job_id = %job_id, kind = e.kind(), error = %e, "Job failed");
            store
                .advance(
                    &job_id,
                    JobStatus::Error,
                    JobUpdate::failed(e.kind(), e.to_string()),
                )
                .await;
        }
    }
}

/// The staged pipeline: materialize, inject, execute.
async fn run_stages(
    store: &JobStore,
    driver: &dyn Toolchain,
    settings: &PipelineSettings,
    job_id: &str,
) -> Result<JobUpdate, PipelineError> {
    store
        .advance(job_id, JobStatus::Running, JobUpdate::default())
        .await;

    let job = store
        .get(job_id)
        .await
        .ok_or_else(|| PipelineError::Internal(format!("job {job_id} not in store")))?;
    let config = job.config;

    // Template copy and injection are blocking filesystem work.
    let workspace = {
        let template = settings.template_root.clone();
        let jobs_root = settings.jobs_root.clone();
        let id = job_id.to_string();
        tokio::task::spawn_blocking(move || materialize(&template, &jobs_root, &id))
            .await
            .map_err(|e| PipelineError::Internal(e.to_string()))??
    };

    {
        let ws = workspace.clone();
        let cfg = config.clone();
        tokio::task::spawn_blocking(move || inject(&ws, &cfg))
            .await
            .map_err(|e| PipelineError::Internal(e.to_string()))??;
    }

    driver.run(store, job_id, &config, &workspace).await
}
