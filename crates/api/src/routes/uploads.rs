//! Route definitions for file uploads.

use axum::routing::post;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// Routes mounted at `/uploads`.
///
/// ```text
/// POST   /{kind}    -> upload_file (kind: icon | firebase)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{kind}", post(uploads::upload_file))
}
