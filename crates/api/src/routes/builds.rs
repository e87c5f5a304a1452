//! Route definitions for the `/builds` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::builds;
use crate::state::AppState;

/// Routes mounted at `/builds`.
///
/// ```text
/// GET    /          -> list_builds
/// POST   /          -> submit_build
/// GET    /{id}      -> get_build
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(builds::list_builds).post(builds::submit_build))
        .route("/{id}", get(builds::get_build))
}
