//! Reader profile: the topics a reading is judged against, and the stored CV.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Topics every profile starts with, in display order.
pub const DEFAULT_INTERESTS: &[&str] = &[
    "leveraging AI in education",
    "marginalized communities",
    "edtechs",
    "learning design",
    "career readiness",
    "K-12",
    "soft skill development",
];

/// Ordered list of interest topics. Defaults first, then caller additions.
/// Duplicates are kept; order only affects display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterestProfile {
    topics: Vec<String>,
}

impl InterestProfile {
    pub fn with_extras<I, S>(extras: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut topics: Vec<String> = DEFAULT_INTERESTS.iter().map(|t| t.to_string()).collect();
        topics.extend(extras.into_iter().map(Into::into));
        Self { topics }
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Relevance sentence used when nothing better can be derived from a summary.
    pub fn default_relevance(&self) -> String {
        format!("Relevant to interests in {self}")
    }
}

impl Default for InterestProfile {
    fn default() -> Self {
        Self::with_extras(Vec::<String>::new())
    }
}

impl fmt::Display for InterestProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.topics.join(", "))
    }
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("CV file not found: {0}")]
    NotFound(String),

    #[error("failed to read CV file: {0}")]
    Read(#[from] std::io::Error),

    #[error("CV file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Loads the CV stored as JSON at `path`.
pub async fn load_cv(path: &Path) -> Result<serde_json::Value, ProfileError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ProfileError::NotFound(path.display().to_string()))
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&raw)?)
}
