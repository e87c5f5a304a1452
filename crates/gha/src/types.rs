//! Serde models for the GitHub Actions REST endpoints the driver uses.

use apkforge_core::config::BuildConfig;
use apkforge_core::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Run status value meaning the run has reached a terminal state.
pub const RUN_STATUS_COMPLETED: &str = "completed";

/// Conclusion value of a successful run.
pub const RUN_CONCLUSION_SUCCESS: &str = "success";

// ---------------------------------------------------------------------------
// Dispatch inputs
// ---------------------------------------------------------------------------

/// Defaults substituted for missing optional fields; the dispatch
/// contract never sends an empty input.
pub const DEFAULT_ADJUST_TOKEN: &str = "DEFAULT_ADJUST_TOKEN";
pub const DEFAULT_EVENT_TOKEN: &str = "DEFAULT_EVENT_TOKEN";

/// Named inputs carried by the `workflow_dispatch` payload.
///
/// Field names match the workflow file's `inputs` declarations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchInputs {
    pub app_name: String,
    pub package_name: String,
    pub web_url: String,
    pub adjust_token: String,
    pub event_token: String,
}

impl DispatchInputs {
    /// Build the inputs from a job config, substituting the documented
    /// defaults for absent tokens.
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            app_name: config.app_name.clone(),
            package_name: config.package_name.clone(),
            web_url: config.web_url.clone(),
            adjust_token: config
                .adjust_token
                .clone()
                .unwrap_or_else(|| DEFAULT_ADJUST_TOKEN.to_string()),
            event_token: config
                .event_token
                .clone()
                .unwrap_or_else(|| DEFAULT_EVENT_TOKEN.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Run listing / detail
// ---------------------------------------------------------------------------

/// One workflow run as returned by the runs endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRun {
    pub id: i64,
    /// e.g. `queued`, `in_progress`, `completed`.
    pub status: String,
    /// Present once the run is completed, e.g. `success`, `failure`.
    pub conclusion: Option<String>,
    pub created_at: Timestamp,
}

impl WorkflowRun {
    pub fn is_completed(&self) -> bool {
        self.status == RUN_STATUS_COMPLETED
    }

    pub fn is_success(&self) -> bool {
        self.conclusion.as_deref() == Some(RUN_CONCLUSION_SUCCESS)
    }
}

/// Envelope of the run-listing endpoint.
#[derive(Debug, Deserialize)]
pub struct RunsResponse {
    pub workflow_runs: Vec<WorkflowRun>,
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

/// One produced artifact of a completed run.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowArtifact {
    pub id: i64,
    pub name: String,
    /// Download URL for the artifact's zip archive.
    pub archive_download_url: String,
}

/// Envelope of the artifacts-listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ArtifactsResponse {
    pub artifacts: Vec<WorkflowArtifact>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
