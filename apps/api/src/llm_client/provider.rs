//! Provider selection: decides which LLM backend serves a request.
//!
//! Precedence is credential-driven: Gemini, then OpenAI-compatible, then
//! offline. `LLM_TYPE` is only a hint and never overrides a present credential.

use std::collections::HashMap;

use tracing::{debug, info};

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const LLM_TYPE: &str = "LLM_TYPE";
/// Name under which the Gemini client expects its credential.
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

const RECOGNIZED_VARS: &[&str] = &[
    GEMINI_API_KEY,
    GEMINI_MODEL,
    OPENAI_API_KEY,
    OPENAI_MODEL,
    LLM_TYPE,
    GOOGLE_API_KEY,
];

/// Owned snapshot of the configuration variables the selector understands.
///
/// Writes made during selection land on the snapshot only; the process
/// environment is never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentView {
    vars: HashMap<String, String>,
}

impl EnvironmentView {
    /// Snapshots the recognised variables from the process environment.
    pub fn from_process() -> Self {
        Self::from_pairs(
            RECOGNIZED_VARS
                .iter()
                .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v))),
        )
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the trimmed value for `key`; blank values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }
}

/// The backend chosen for one request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderChoice {
    /// Gemini; the credential is exported as `GOOGLE_API_KEY` on the view.
    Gemini { model: String },
    OpenAiCompatible { model: String, api_key: String },
    /// No credential configured. A normal outcome, not an error.
    Offline,
}

impl ProviderChoice {
    pub fn label(&self) -> &'static str {
        match self {
            ProviderChoice::Gemini { .. } => "gemini",
            ProviderChoice::OpenAiCompatible { .. } => "openai",
            ProviderChoice::Offline => "offline",
        }
    }
}

/// Picks the active backend from `env`.
///
/// Side effect: when Gemini is chosen, the key is copied to `GOOGLE_API_KEY`
/// on `env`, which is where `GeminiClient::from_view` reads it.
pub fn select_provider(env: &mut EnvironmentView) -> ProviderChoice {
    let choice = if let Some(key) = env.get(GEMINI_API_KEY).map(str::to_string) {
        env.set(GOOGLE_API_KEY, &key);
        ProviderChoice::Gemini {
            model: env.get(GEMINI_MODEL).unwrap_or(DEFAULT_GEMINI_MODEL).to_string(),
        }
    } else if let Some(key) = env.get(OPENAI_API_KEY) {
        ProviderChoice::OpenAiCompatible {
            model: env.get(OPENAI_MODEL).unwrap_or(DEFAULT_OPENAI_MODEL).to_string(),
            api_key: key.to_string(),
        }
    } else {
        ProviderChoice::Offline
    };

    if let Some(hint) = env.get(LLM_TYPE) {
        let hint = hint.to_ascii_lowercase();
        if hint != choice.label() && hint != "default" {
            info!(
                "LLM_TYPE={hint} ignored; configured credentials select '{}'",
                choice.label()
            );
        }
    }
    debug!("Provider selected: {}", choice.label());

    choice
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_credentials_prefers_gemini() {
        let mut env = EnvironmentView::from_pairs([
            (GEMINI_API_KEY, "g-key"),
            (OPENAI_API_KEY, "o-key"),
        ]);
        assert_eq!(
            select_provider(&mut env),
            ProviderChoice::Gemini {
                model: DEFAULT_GEMINI_MODEL.to_string()
            }
        );
    }

    #[test]
    fn test_only_openai_selects_openai_compatible() {
        let mut env = EnvironmentView::from_pairs([(OPENAI_API_KEY, "o-key")]);
        assert_eq!(
            select_provider(&mut env),
            ProviderChoice::OpenAiCompatible {
                model: DEFAULT_OPENAI_MODEL.to_string(),
                api_key: "o-key".to_string(),
            }
        );
    }

    #[test]
    fn test_no_credentials_is_offline() {
        let mut env = EnvironmentView::default();
        assert_eq!(select_provider(&mut env), ProviderChoice::Offline);
    }

    #[test]
    fn test_blank_credentials_count_as_absent() {
        let mut env = EnvironmentView::from_pairs([(GEMINI_API_KEY, "  "), (OPENAI_API_KEY, "")]);
        assert_eq!(select_provider(&mut env), ProviderChoice::Offline);
    }

    #[test]
    fn test_model_overrides_are_honoured() {
        let mut env = EnvironmentView::from_pairs([
            (GEMINI_API_KEY, "g-key"),
            (GEMINI_MODEL, "gemini-2.0-flash"),
        ]);
        assert_eq!(
            select_provider(&mut env),
            ProviderChoice::Gemini {
                model: "gemini-2.0-flash".to_string()
            }
        );

        let mut env = EnvironmentView::from_pairs([
            (OPENAI_API_KEY, "o-key"),
            (OPENAI_MODEL, "gpt-4o-mini"),
        ]);
        match select_provider(&mut env) {
            ProviderChoice::OpenAiCompatible { model, .. } => assert_eq!(model, "gpt-4o-mini"),
            other => panic!("expected OpenAI, got {other:?}"),
        }
    }

    #[test]
    fn test_gemini_exports_google_api_key_on_view() {
        let mut env = EnvironmentView::from_pairs([(GEMINI_API_KEY, "g-key")]);
        select_provider(&mut env);
        assert_eq!(env.get(GOOGLE_API_KEY), Some("g-key"));
    }

    #[test]
    fn test_openai_does_not_export_google_api_key() {
        let mut env = EnvironmentView::from_pairs([(OPENAI_API_KEY, "o-key")]);
        select_provider(&mut env);
        assert_eq!(env.get(GOOGLE_API_KEY), None);
    }

    #[test]
    fn test_stale_type_hint_does_not_override_credentials() {
        let mut env = EnvironmentView::from_pairs([
            (LLM_TYPE, "openai"),
            (GEMINI_API_KEY, "g-key"),
            (OPENAI_API_KEY, "o-key"),
        ]);
        assert_eq!(select_provider(&mut env).label(), "gemini");

        let mut env = EnvironmentView::from_pairs([(LLM_TYPE, "gemini"), (OPENAI_API_KEY, "o-key")]);
        assert_eq!(select_provider(&mut env).label(), "openai");
    }

    #[test]
    fn test_selection_is_repeatable() {
        let base = EnvironmentView::from_pairs([(OPENAI_API_KEY, "o-key")]);
        let first = select_provider(&mut base.clone());
        let second = select_provider(&mut base.clone());
        assert_eq!(first, second);
    }
}
