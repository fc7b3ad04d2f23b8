//! Read-only access to uploaded images.

use axum::{
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::file_storage::{is_safe_file_name, FILE_CATEGORIES};

pub async fn serve_file(
    State(state): State<AppState>,
    Path((category, file_name)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    if !FILE_CATEGORIES.contains(&category.as_str()) {
        return Err(ApiError::NotFound(format!("unknown file category {}", category)));
    }
    if !is_safe_file_name(&file_name) {
        return Err(ApiError::Validation("invalid file name".to_string()));
    }

    let path = state
        .files
        .resolve(&category, &file_name)
        .ok_or_else(|| ApiError::Validation("invalid file name".to_string()))?;

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(format!("file {}", file_name)));
        }
        Err(e) => {
            return Err(ApiError::Internal(format!(
                "reading {}: {}",
                path.display(),
                e
            )));
        }
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok(([(CONTENT_TYPE, mime.essence_str().to_string())], bytes).into_response())
}
