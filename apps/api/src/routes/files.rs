//! Generated-file download and the stored CV.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use crate::errors::AppError;
use crate::profile::{load_cv, ProfileError};
use crate::state::AppState;
use crate::uploads::has_extension;

/// Accepts a bare file name only; anything that could leave the upload
/// directory is rejected.
fn validate_download_name(filename: &str) -> Result<(), AppError> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(AppError::Validation("Invalid file name".to_string()));
    }
    Ok(())
}

fn content_type_for(filename: &str) -> &'static str {
    if has_extension(filename, "xlsx") {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    } else if has_extension(filename, "pdf") {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

/// GET /api/download/:filename
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validate_download_name(&filename)?;

    let path = state.config.upload_dir.join(&filename);
    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("File not found".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let disposition = format!("attachment; filename=\"{filename}\"");
    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&filename).to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    ))
}

/// GET /api/cv
pub async fn handle_cv(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    match load_cv(&state.config.cv_path).await {
        Ok(cv) => Ok(Json(cv)),
        Err(ProfileError::NotFound(_)) => Err(AppError::NotFound("CV not found".to_string())),
        Err(e) => Err(AppError::Storage(e.to_string())),
    }
}
