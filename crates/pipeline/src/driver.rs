//! The unified toolchain capability.
//!
//! The orchestrator drives builds through this trait and stays agnostic
//! to which variant is active; the variant is selected once from
//! configuration at startup.

use std::path::Path;

use async_trait::async_trait;

use apkforge_core::config::BuildConfig;
use apkforge_gha::GhaToolchain;
use apkforge_store::{JobStore, JobUpdate};
use apkforge_toolchain::LocalToolchain;

use crate::error::PipelineError;

/// Executes the build for one job against its prepared workspace.
///
/// Implementations report their internal stage entries to the store
/// (`building`/`signing`, or `triggering`/`dispatched`/`running-remote`)
/// and return the fields to record on the finished job.
#[async_trait]
pub trait Toolchain: Send + Sync {
    async fn run(
        &self,
        store: &JobStore,
        job_id: &str,
        config: &BuildConfig,
        workspace: &Path,
    ) -> Result<JobUpdate, PipelineError>;
}

#[async_trait]
impl Toolchain for LocalToolchain {
    async fn run(
        &self,
        store: &JobStore,
        job_id: &str,
        config: &BuildConfig,
        workspace: &Path,
    ) -> Result<JobUpdate, PipelineError> {
        Ok(self.execute(store, job_id, config, workspace).await?)
    }
}

#[async_trait]
impl Toolchain for GhaToolchain {
    async fn run(
        &self,
        store: &JobStore,
        job_id: &str,
        config: &BuildConfig,
        workspace: &Path,
    ) -> Result<JobUpdate, PipelineError> {
        Ok(self.execute(store, job_id, config, workspace).await?)
    }
}
