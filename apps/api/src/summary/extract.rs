//! Response Extractor: turns free-form LLM output into a `NormalizedSummary`.
//!
//! Strategies, first success wins:
//! 1. A fenced ```json block holding an object with `article_title`/`title`,
//!    `key_concepts` and `relevance`.
//! 2. A line-classifying heuristic over the plain text.
//!
//! Extraction is total: malformed blocks and empty input degrade to
//! placeholders, never to an error.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::profile::InterestProfile;
use crate::summary::record::{
    NormalizedSummary, KEY_CONCEPTS_PLACEHOLDER, RELEVANCE_PLACEHOLDER, TITLE_PLACEHOLDER,
};

/// Characters of raw text kept when no key-concept lines are found.
const EXCERPT_CHARS: usize = 500;
/// Lines this short or shorter are ignored by the heuristic.
const MIN_LINE_CHARS: usize = 10;
const MAX_CONCEPT_LINES: usize = 3;
const MAX_RELEVANCE_LINES: usize = 2;

const CONCEPT_KEYWORDS: &[&str] = &["concept", "definition"];
const RELEVANCE_KEYWORDS: &[&str] = &["relevant", "interest"];

fn fenced_json() -> &'static Regex {
    static FENCED_JSON: OnceLock<Regex> = OnceLock::new();
    FENCED_JSON.get_or_init(|| {
        Regex::new(r"(?s)```(?i:json)?(.*?)```").expect("fenced block pattern is valid")
    })
}

/// Extracts a summary with the default interest profile.
pub fn extract(raw_text: &str, fallback_label: &str) -> NormalizedSummary {
    Extractor::default().extract(raw_text, fallback_label)
}

/// Extractor bound to an interest profile, which supplies the default
/// relevance sentence for the heuristic path.
#[derive(Debug, Clone)]
pub struct Extractor {
    default_relevance: String,
}

impl Extractor {
    pub fn new(profile: &InterestProfile) -> Self {
        Self {
            default_relevance: profile.default_relevance(),
        }
    }

    pub fn default_relevance(&self) -> &str {
        &self.default_relevance
    }

    pub fn extract(&self, raw_text: &str, fallback_label: &str) -> NormalizedSummary {
        let title_fallback = non_blank(fallback_label).unwrap_or(TITLE_PLACEHOLDER);

        if let Some(summary) = extract_structured(raw_text, title_fallback) {
            return summary;
        }
        debug!("No usable JSON block in LLM output, using plain-text heuristic");
        self.extract_heuristic(raw_text, title_fallback)
    }

    fn extract_heuristic(&self, raw_text: &str, title: &str) -> NormalizedSummary {
        let mut concepts: Vec<&str> = Vec::new();
        let mut relevance: Vec<&str> = Vec::new();

        for line in raw_text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with(|c: char| c == '#' || c == '*') {
                continue;
            }
            if line.chars().count() <= MIN_LINE_CHARS {
                continue;
            }
            let lower = line.to_lowercase();
            if CONCEPT_KEYWORDS.iter().any(|k| lower.contains(k)) {
                concepts.push(line);
            } else if RELEVANCE_KEYWORDS.iter().any(|k| lower.contains(k)) {
                relevance.push(line);
            }
        }

        let key_concepts = if concepts.is_empty() {
            excerpt(raw_text)
        } else {
            concepts[..concepts.len().min(MAX_CONCEPT_LINES)].join(" ")
        };
        let relevance = if relevance.is_empty() {
            self.default_relevance.clone()
        } else {
            relevance[..relevance.len().min(MAX_RELEVANCE_LINES)].join(" ")
        };

        NormalizedSummary {
            title: title.to_string(),
            key_concepts,
            relevance,
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&InterestProfile::default())
    }
}

/// Tries every fenced block in order; the first one holding a JSON object wins.
fn extract_structured(raw_text: &str, title_fallback: &str) -> Option<NormalizedSummary> {
    fenced_json()
        .captures_iter(raw_text)
        .filter_map(|caps| caps.get(1))
        .map(|body| body.as_str().trim())
        .filter(|body| body.starts_with('{') && body.ends_with('}'))
        .find_map(|block| match serde_json::from_str::<Value>(block) {
            Ok(Value::Object(object)) => Some(from_object(&object, title_fallback)),
            Ok(_) => None,
            Err(e) => {
                debug!("Malformed JSON block in LLM output: {e}");
                None
            }
        })
}

fn from_object(object: &Map<String, Value>, title_fallback: &str) -> NormalizedSummary {
    let title = ["article_title", "title"]
        .iter()
        .find_map(|key| object.get(*key).and_then(field_text))
        .unwrap_or_else(|| title_fallback.to_string());

    NormalizedSummary {
        title,
        key_concepts: object
            .get("key_concepts")
            .and_then(field_text)
            .unwrap_or_else(|| KEY_CONCEPTS_PLACEHOLDER.to_string()),
        relevance: object
            .get("relevance")
            .and_then(field_text)
            .unwrap_or_else(|| RELEVANCE_PLACEHOLDER.to_string()),
    }
}

/// Flattens a JSON field to text. Lists are joined with newlines; blank
/// results count as absent.
fn field_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => non_blank(s).map(|_| s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    };
    (!text.trim().is_empty()).then_some(text)
}

fn excerpt(raw_text: &str) -> String {
    if raw_text.trim().is_empty() {
        return KEY_CONCEPTS_PLACEHOLDER.to_string();
    }
    match raw_text.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &raw_text[..cut]),
        None => raw_text.to_string(),
    }
}

fn non_blank(s: &str) -> Option<&str> {
    (!s.trim().is_empty()).then_some(s)
}
