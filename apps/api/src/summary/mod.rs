// Reading summaries: PDF text → LLM → NormalizedSummary → one-row workbook.
// The extractor is the only part with real logic; everything else is plumbing.

pub mod extract;
pub mod handlers;
pub mod pdf;
pub mod prompts;
pub mod record;
pub mod spreadsheet;

pub use extract::Extractor;
pub use record::NormalizedSummary;
