//! Multipart upload helpers shared by the summary and speech handlers.

use std::path::Path;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

/// A single file pulled out of a multipart request.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub data: Bytes,
}

/// Returns the first file sent under `field_name`, skipping other fields.
pub async fn read_file_field(
    multipart: &mut Multipart,
    field_name: &str,
) -> Result<Option<FileUpload>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        return Ok(Some(FileUpload { filename, data }));
    }
    Ok(None)
}

/// Reduces an uploaded filename to a safe basename: ASCII letters, digits,
/// `.`, `-` and `_`; whitespace becomes `_`; leading dots are stripped.
pub fn sanitize_filename(raw: &str) -> String {
    let basename = raw.rsplit(&['/', '\\'][..]).next().unwrap_or_default();
    let cleaned: String = basename
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

/// Case-insensitive extension check.
pub fn has_extension(filename: &str, expected: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(expected))
}

/// Filename without its final extension.
pub fn file_stem(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
}
