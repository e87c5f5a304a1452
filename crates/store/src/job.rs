//! Job model: the unit of work tracked end-to-end by id.

use apkforge_core::config::BuildConfig;
use apkforge_core::types::Timestamp;
use serde::Serialize;

use crate::status::JobStatus;

/// One build request, tracked from submission to terminal state.
///
/// `id` is assigned exactly once and never reused; `config` is read-only
/// after submission. Exactly one of (`artifact` set) or (`status ==
/// error`) holds once the job is terminal.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    /// Opaque unique identifier (UUID v4).
    pub id: String,
    pub status: JobStatus,
    /// Immutable configuration snapshot from submission time.
    pub config: BuildConfig,
    pub created_at: Timestamp,
    /// Set when a terminal state is entered.
    pub finished_at: Option<Timestamp>,
    /// Entry time of every stage entered, in order.
    pub history: Vec<StageEntry>,
    /// Remote CI run identifier (remote toolchain only).
    pub run_id: Option<i64>,
    /// Download reference to the produced artifact.
    pub artifact: Option<String>,
    /// Download reference to the raw CI archive (remote toolchain only).
    pub archive: Option<String>,
    /// Explanatory note for successful-but-incomplete completions.
    pub message: Option<String>,
    /// Failure classification and message once the job errors.
    pub error: Option<JobError>,
}

/// A status the job entered and when.
#[derive(Debug, Clone, Serialize)]
pub struct StageEntry {
    pub status: JobStatus,
    pub entered_at: Timestamp,
}

/// Failure record attached to an errored job.
#[derive(Debug, Clone, Serialize)]
pub struct JobError {
    /// Stable classification, e.g. `build_error`.
    pub kind: String,
    /// Human-readable diagnostics.
    pub message: String,
}

/// Fields settable alongside a status advance.
///
/// `None` fields leave the job's current value untouched, so completion
/// and stage callbacks can update independently.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub run_id: Option<i64>,
    pub artifact: Option<String>,
    pub archive: Option<String>,
    pub message: Option<String>,
    pub error: Option<JobError>,
}

impl JobUpdate {
    /// Update carrying only an error record.
    pub fn failed(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: Some(JobError {
                kind: kind.into(),
                message: message.into(),
            }),
            ..Self::default()
        }
    }
}
