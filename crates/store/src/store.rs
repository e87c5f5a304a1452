//! In-memory job store.
//!
//! The store is the only shared mutable structure in the pipeline.
//! Per-job updates are atomic with respect to concurrent readers: both
//! sides go through one `RwLock`, so a poller never observes a torn
//! update. Jobs are visible to `get` from the instant `create` returns,
//! before any pipeline stage has run.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use apkforge_core::config::BuildConfig;

use crate::job::{Job, JobUpdate, StageEntry};
use crate::status::JobStatus;

/// Process-lifetime job table.
///
/// Created once at startup and shared behind an `Arc`. Holds every job
/// for the lifetime of the process; durability, if wanted, goes behind
/// this same interface.
#[derive(Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<String, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new job with a fresh id and status `queued`.
    ///
    /// Returns the job snapshot immediately; no pipeline work has
    /// started when this returns.
    pub async fn create(&self, config: BuildConfig) -> Job {
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4().to_string(),
            status: JobStatus::Queued,
            config,
            created_at: now,
            finished_at: None,
            history: vec![StageEntry {
                status: JobStatus::Queued,
                entered_at: now,
            }],
            run_id: None,
            artifact: None,
            archive: None,
            message: None,
            error: None,
        };

        self.jobs
            .write()
            .await
            .insert(job.id.clone(), job.clone());

        tracing::info!(job_id = %job.id, "Job created");
        job
    }

    /// Atomically advance a job's status and merge `update` fields.
    ///
    /// Returns `true` if the update was applied. A job already in a
    /// terminal state is left untouched (silent no-op) so that racing
    /// completion callbacks cannot corrupt a settled outcome. An invalid
    /// non-monotone transition is also a no-op, logged at warn level.
    pub async fn advance(&self, id: &str, status: JobStatus, update: JobUpdate) -> bool {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(id) else {
            tracing::warn!(job_id = id, "Advance for unknown job ignored");
            return false;
        };

        if job.status.is_terminal() {
            tracing::debug!(
                job_id = id,
                current = %job.status,
                requested = %status,
                "Job already terminal, advance ignored",
            );
            return false;
        }

        if !job.status.can_advance(status) {
            tracing::warn!(
                job_id = id,
                current = %job.status,
                requested = %status,
                "Non-monotone status transition ignored",
            );
            return false;
        }

        let now = Utc::now();
        job.status = status;
        job.history.push(StageEntry {
            status,
            entered_at: now,
        });
        if status.is_terminal() {
            job.finished_at = Some(now);
        }

        if update.run_id.is_some() {
            job.run_id = update.run_id;
        }
        if update.artifact.is_some() {
            job.artifact = update.artifact;
        }
        if update.archive.is_some() {
            job.archive = update.archive;
        }
        if update.message.is_some() {
            job.message = update.message;
        }
        if update.error.is_some() {
            job.error = update.error;
        }

        tracing::info!(job_id = id, status = %status, "Job advanced");
        true
    }

    /// Read-only snapshot of a job, reflecting the latest visible advance.
    pub async fn get(&self, id: &str) -> Option<Job> {
        self.jobs.read().await.get(id).cloned()
    }

    /// Snapshots of all jobs, newest first.
    pub async fn list(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.jobs.read().await.values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
