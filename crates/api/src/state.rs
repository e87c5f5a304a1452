use std::sync::Arc;

use apkforge_pipeline::{Orchestrator, PipelineSettings};
use apkforge_store::JobStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Accepts submissions and runs job pipelines.
    pub orchestrator: Arc<Orchestrator>,
    /// Job table, shared with the orchestrator.
    pub store: Arc<JobStore>,
    /// Pipeline paths (upload and output areas).
    pub settings: Arc<PipelineSettings>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
