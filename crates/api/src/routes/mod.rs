pub mod builds;
pub mod health;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /builds            submit, list
/// /builds/{id}       status
/// /uploads/{kind}    icon / firebase file upload
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/builds", builds::router())
        .nest("/uploads", uploads::router())
}
