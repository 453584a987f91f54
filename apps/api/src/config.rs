use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// What to do when no LLM credential is configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoProviderPolicy {
    /// Serve canned demonstration content.
    #[default]
    Demo,
    /// Reject the request with 503 Service Unavailable.
    Unavailable,
}

impl FromStr for NoProviderPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" => Ok(NoProviderPolicy::Demo),
            "unavailable" | "error" => Ok(NoProviderPolicy::Unavailable),
            other => bail!("NO_PROVIDER_POLICY must be 'demo' or 'unavailable', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// LLM credentials are deliberately absent: they are read per request by
/// `llm_client::provider::select_provider`.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub cv_path: PathBuf,
    pub extra_interests: Vec<String>,
    pub no_provider_policy: NoProviderPolicy,
    pub llm_timeout_secs: u64,
    pub speech_timeout_secs: u64,
    pub openai_base_url: String,
    pub tts_voice: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 5001)?,
            rust_log: env_or("RUST_LOG", "info"),
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "uploads")),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            cv_path: PathBuf::from(env_or("CV_PATH", "cv.json")),
            extra_interests: split_list(&env_or("EXTRA_INTERESTS", "")),
            no_provider_policy: parse_env("NO_PROVIDER_POLICY", NoProviderPolicy::Demo)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            speech_timeout_secs: parse_env("SPEECH_TIMEOUT_SECS", 60)?,
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            tts_voice: env_or("TTS_VOICE", "nova"),
        })
    }

    /// Defaults without touching the process environment.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            port: 5001,
            rust_log: "debug".to_string(),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cv_path: PathBuf::from("cv.json"),
            extra_interests: Vec::new(),
            no_provider_policy: NoProviderPolicy::Demo,
            llm_timeout_secs: 5,
            speech_timeout_secs: 5,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            tts_voice: "nova".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        _ => Ok(default),
    }
}

/// Splits a comma-separated list, dropping blank items.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parses_known_values() {
        assert_eq!("demo".parse::<NoProviderPolicy>().unwrap(), NoProviderPolicy::Demo);
        assert_eq!(
            " Unavailable ".parse::<NoProviderPolicy>().unwrap(),
            NoProviderPolicy::Unavailable
        );
        assert_eq!(
            "error".parse::<NoProviderPolicy>().unwrap(),
            NoProviderPolicy::Unavailable
        );
    }

    #[test]
    fn test_policy_rejects_unknown_value() {
        assert!("sometimes".parse::<NoProviderPolicy>().is_err());
    }

    #[test]
    fn test_policy_default_is_demo() {
        assert_eq!(NoProviderPolicy::default(), NoProviderPolicy::Demo);
    }

    #[test]
    fn test_split_list_trims_and_drops_blanks() {
        assert_eq!(
            split_list(" adult learning, ,museum education,"),
            vec!["adult learning".to_string(), "museum education".to_string()]
        );
        assert!(split_list("").is_empty());
    }
}
