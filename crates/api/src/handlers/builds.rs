//! Handlers for the `/builds` resource.
//!
//! Submission is fire-and-forget: the job id comes back synchronously
//! while the pipeline runs on its own task. Status polling always
//! returns a well-formed snapshot, including for errored jobs.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use apkforge_core::config::BuildConfig;
use apkforge_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/builds
///
/// Submit a new build. Returns 201 with the created job (status
/// `queued`); the id is immediately pollable via `GET /builds/{id}`.
pub async fn submit_build(
    State(state): State<AppState>,
    Json(config): Json<BuildConfig>,
) -> AppResult<impl IntoResponse> {
    let job = state.orchestrator.submit(config).await?;

    tracing::info!(
        job_id = %job.id,
        app_name = %job.config.app_name,
        package_name = %job.config.package_name,
        "Build submitted",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// GET /api/v1/builds/{id}
///
/// Current snapshot of one job, or 404 for unknown ids.
pub async fn get_build(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let job = state
        .store
        .get(&job_id)
        .await
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))?;

    Ok(Json(DataResponse { data: job }))
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// GET /api/v1/builds
///
/// All jobs known to this process, newest first.
pub async fn list_builds(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let jobs = state.store.list().await;
    Ok(Json(DataResponse { data: jobs }))
}
