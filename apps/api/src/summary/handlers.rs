//! Axum route handlers for reading summaries.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{Backend, LlmError};
use crate::state::AppState;
use crate::summary::pdf;
use crate::summary::prompts::{build_summary_prompt, DEMO_SUMMARY_RESPONSE, SUMMARY_SYSTEM};
use crate::summary::NormalizedSummary;
use crate::summary::spreadsheet::write_summary_async;
use crate::uploads::{file_stem, has_extension, read_file_field, sanitize_filename};

const PDF_FIELD: &str = "pdf_file";

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub success: bool,
    pub mode: &'static str,
    /// Raw text the summary was extracted from.
    pub result: String,
    pub summary: NormalizedSummary,
    /// Name of the generated workbook, downloadable via /api/download.
    pub excel_file: Option<String>,
}

/// POST /api/summarize
///
/// Multipart upload of a PDF reading. Extracts its text, asks the LLM (or the
/// demo backend) for a summary, normalizes it and writes a one-row workbook.
pub async fn handle_summarize(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SummarizeResponse>, AppError> {
    let upload = read_file_field(&mut multipart, PDF_FIELD)
        .await?
        .ok_or_else(|| AppError::Validation("No PDF file uploaded".to_string()))?;

    if upload.filename.trim().is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }
    let filename = sanitize_filename(&upload.filename);
    if !has_extension(&filename, "pdf") {
        return Err(AppError::Validation("Only PDF files are allowed".to_string()));
    }
    let stem = file_stem(&filename).to_string();

    let upload_dir = &state.config.upload_dir;
    tokio::fs::create_dir_all(upload_dir).await?;
    tokio::fs::write(upload_dir.join(&filename), &upload.data).await?;
    info!("Stored upload {} ({} bytes)", filename, upload.data.len());

    let pdf_text = match pdf::extract_text(upload.data).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Could not read PDF {filename}: {e}");
            pdf::unreadable_note(&e)
        }
    };

    let backend = state.llm_backend()?;
    let raw = match &backend {
        Backend::Live(llm) => {
            let prompt = build_summary_prompt(&pdf_text, &state.interests);
            match llm.call(&prompt, SUMMARY_SYSTEM).await {
                Ok(text) => text,
                // an empty answer still yields a complete (placeholder) record
                Err(LlmError::EmptyContent) => {
                    warn!("LLM returned no text for {filename}");
                    String::new()
                }
                Err(e) => return Err(AppError::Llm(format!("Summarization failed: {e}"))),
            }
        }
        Backend::Demo => DEMO_SUMMARY_RESPONSE.to_string(),
    };

    let summary = state.extractor.extract(&raw, &stem);

    let excel_name = format!("{stem}_summary.xlsx");
    let excel_file = match write_summary_async(summary.clone(), upload_dir.join(&excel_name)).await
    {
        Ok(()) => {
            info!("Wrote summary workbook {excel_name}");
            Some(excel_name)
        }
        Err(e) => {
            warn!("Could not write summary workbook {excel_name}: {e}");
            None
        }
    };

    Ok(Json(SummarizeResponse {
        success: true,
        mode: backend.mode(),
        result: raw,
        summary,
        excel_file,
    }))
}
