//! Handlers for icon and Firebase-config uploads.
//!
//! Uploaded files land in the pipeline's upload directory under a
//! collision-free name; the returned path is what submissions reference
//! in `icon_path`/`firebase_path`.

use std::path::Path as FsPath;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Accepted upload kinds and their fallback file extensions.
const UPLOAD_KINDS: &[(&str, &str)] = &[("icon", "png"), ("firebase", "json")];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Stored path, usable as a file reference in a build submission.
    pub file_path: String,
}

/// POST /api/v1/uploads/{kind}
///
/// Store one multipart `file` field under the upload directory. Returns
/// 201 with the stored path. Unknown kinds are rejected with 400.
pub async fn upload_file(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let fallback_ext = UPLOAD_KINDS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown upload kind: '{kind}'")))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let extension = field
            .file_name()
            .and_then(|name| FsPath::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(sanitize_extension)
            .unwrap_or_else(|| fallback_ext.to_string());

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

        let file_name = format!("{kind}-{}.{extension}", Uuid::new_v4());
        let dest = state.settings.upload_dir.join(&file_name);
        tokio::fs::write(&dest, &bytes)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

        tracing::info!(kind = %kind, path = %dest.display(), bytes = bytes.len(), "File uploaded");

        return Ok((
            StatusCode::CREATED,
            Json(DataResponse {
                data: UploadResponse {
                    file_path: dest.display().to_string(),
                },
            }),
        ));
    }

    Err(AppError::BadRequest(
        "Multipart body must contain a 'file' field".to_string(),
    ))
}

/// Keep only filename-safe extension characters.
fn sanitize_extension(ext: &str) -> String {
    ext.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect::<String>()
        .to_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
