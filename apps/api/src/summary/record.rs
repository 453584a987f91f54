use serde::{Deserialize, Serialize};

pub const KEY_CONCEPTS_PLACEHOLDER: &str = "No key concepts provided";
pub const RELEVANCE_PLACEHOLDER: &str = "No relevance information provided";
pub const TITLE_PLACEHOLDER: &str = "Untitled reading";

/// Spreadsheet headers, in column order.
pub const COLUMN_HEADERS: [&str; 3] = [
    "Name",
    "Key concepts & Definitions",
    "Relevance & Curiosity",
];

/// Canonical three-field summary of one reading.
///
/// All fields are non-empty once produced by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedSummary {
    pub title: String,
    pub key_concepts: String,
    pub relevance: String,
}

impl NormalizedSummary {
    /// Cell values matching `COLUMN_HEADERS`.
    pub fn row(&self) -> [&str; 3] {
        [&self.title, &self.key_concepts, &self.relevance]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_api_keys() {
        let summary = NormalizedSummary {
            title: "T".to_string(),
            key_concepts: "a\nb".to_string(),
            relevance: "r".to_string(),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"title": "T", "key_concepts": "a\nb", "relevance": "r"})
        );
    }

    #[test]
    fn test_row_follows_header_order() {
        let summary = NormalizedSummary {
            title: "Title".to_string(),
            key_concepts: "Concepts".to_string(),
            relevance: "Why".to_string(),
        };
        assert_eq!(summary.row(), ["Title", "Concepts", "Why"]);
        assert_eq!(COLUMN_HEADERS[0], "Name");
    }
}
