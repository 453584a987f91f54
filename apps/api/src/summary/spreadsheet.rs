//! Single-row spreadsheet output for a `NormalizedSummary`.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;

use crate::summary::record::{NormalizedSummary, COLUMN_HEADERS};

const COLUMN_WIDTHS: [f64; 3] = [40.0, 80.0, 80.0];

#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("spreadsheet task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Writes a header row plus one summary row to `path` (xlsx).
pub fn write_summary(summary: &NormalizedSummary, path: &Path) -> Result<(), SpreadsheetError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let wrapped = Format::new().set_text_wrap();

    let sheet = workbook.add_worksheet();
    for (col, (title, width)) in COLUMN_HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, &header)?;
        sheet.set_column_width(col, width)?;
    }
    for (col, value) in summary.row().iter().enumerate() {
        sheet.write_string_with_format(1, col as u16, *value, &wrapped)?;
    }

    workbook.save(path)?;
    Ok(())
}

/// `write_summary` on the blocking pool.
pub async fn write_summary_async(
    summary: NormalizedSummary,
    path: std::path::PathBuf,
) -> Result<(), SpreadsheetError> {
    tokio::task::spawn_blocking(move || write_summary(&summary, &path)).await?
}
