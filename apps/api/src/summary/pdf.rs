use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to extract text from PDF: {0}")]
    Extract(String),

    #[error("PDF extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Extracts the text layer of a PDF. Parsing is CPU-bound, so it runs on the
/// blocking pool; a panic inside the parser surfaces as `PdfError::Task`.
pub async fn extract_text(data: Bytes) -> Result<String, PdfError> {
    tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&data).map_err(|e| PdfError::Extract(e.to_string()))
    })
    .await?
}

/// Text handed to the summarizer when the PDF could not be read. The
/// workflow carries on so the caller still gets a (placeholder) summary.
pub fn unreadable_note(err: &PdfError) -> String {
    format!("Error reading PDF: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_bytes_are_an_error() {
        let result = extract_text(Bytes::from_static(b"definitely not a pdf")).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_unreadable_note_has_prefix() {
        let note = unreadable_note(&PdfError::Extract("bad xref".to_string()));
        assert_eq!(note, "Error reading PDF: failed to extract text from PDF: bad xref");
    }
}
