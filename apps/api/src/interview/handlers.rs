//! Axum route handlers for interview preparation.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::generator::prepare_interview;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InterviewRequest {
    #[serde(default)]
    pub cv_text: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewResponse {
    pub success: bool,
    pub mode: &'static str,
    pub result: String,
}

/// POST /api/interview
///
/// Generates practice questions, STAR answers and confidence tips from a CV
/// and a job description.
pub async fn handle_interview(
    State(state): State<AppState>,
    Json(request): Json<InterviewRequest>,
) -> Result<Json<InterviewResponse>, AppError> {
    if request.cv_text.trim().is_empty() || request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "CV text and job description are required".to_string(),
        ));
    }

    let backend = state.llm_backend()?;
    let result = prepare_interview(&backend, &request.cv_text, &request.job_description).await?;

    Ok(Json(InterviewResponse {
        success: true,
        mode: backend.mode(),
        result,
    }))
}
