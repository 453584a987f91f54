/// LLM Client: the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// Handlers obtain a `Backend` through `resolve_backend` and either call the
/// live client or fall back to demo content.
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Config, NoProviderPolicy};
use crate::errors::AppError;

pub mod gemini;
pub mod openai;
pub mod prompts;
pub mod provider;

use provider::{EnvironmentView, ProviderChoice, GOOGLE_API_KEY};

const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
}

/// Error envelope shared by the Gemini and OpenAI APIs.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Knobs for building live clients, taken from `Config`.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub timeout: Duration,
    pub openai_base_url: String,
}

impl ClientSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.llm_timeout_secs),
            openai_base_url: config.openai_base_url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
enum Endpoint {
    Gemini {
        model: String,
        api_key: String,
    },
    OpenAi {
        model: String,
        api_key: String,
        base_url: String,
    },
}

/// Live client for the selected provider, with retry on 429/5xx.
#[derive(Debug, Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: Endpoint,
}

impl LlmClient {
    /// Builds a Gemini client. The key is read from `GOOGLE_API_KEY` on the
    /// view, which `select_provider` populates when it picks Gemini.
    pub fn gemini(
        env: &EnvironmentView,
        model: &str,
        settings: &ClientSettings,
    ) -> Result<Self, LlmError> {
        let api_key = env
            .get(GOOGLE_API_KEY)
            .ok_or(LlmError::MissingCredential(GOOGLE_API_KEY))?;
        Ok(Self {
            client: http_client(settings.timeout)?,
            endpoint: Endpoint::Gemini {
                model: model.to_string(),
                api_key: api_key.to_string(),
            },
        })
    }

    pub fn openai(model: &str, api_key: &str, settings: &ClientSettings) -> Result<Self, LlmError> {
        Ok(Self {
            client: http_client(settings.timeout)?,
            endpoint: Endpoint::OpenAi {
                model: model.to_string(),
                api_key: api_key.to_string(),
                base_url: settings.openai_base_url.clone(),
            },
        })
    }

    pub fn model(&self) -> &str {
        match &self.endpoint {
            Endpoint::Gemini { model, .. } | Endpoint::OpenAi { model, .. } => model,
        }
    }

    fn request(&self, prompt: &str, system: &str) -> RequestBuilder {
        match &self.endpoint {
            Endpoint::Gemini { model, api_key } => self
                .client
                .post(gemini::endpoint(model))
                .header("x-goog-api-key", api_key)
                .json(&gemini::GenerateRequest::new(system, prompt, MAX_TOKENS)),
            Endpoint::OpenAi {
                model,
                api_key,
                base_url,
            } => self
                .client
                .post(openai::endpoint(base_url))
                .bearer_auth(api_key)
                .json(&openai::ChatRequest::new(model, system, prompt, MAX_TOKENS)),
        }
    }

    /// Calls the provider and returns the generated text.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.request(prompt, system).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            let text = match &self.endpoint {
                Endpoint::Gemini { .. } => {
                    let parsed: gemini::GenerateResponse = serde_json::from_str(&body)?;
                    if let Some(usage) = &parsed.usage_metadata {
                        debug!(
                            "Gemini call succeeded: input_tokens={}, output_tokens={}",
                            usage.prompt_token_count, usage.candidates_token_count
                        );
                    }
                    parsed.text()
                }
                Endpoint::OpenAi { .. } => {
                    let parsed: openai::ChatResponse = serde_json::from_str(&body)?;
                    if let Some(usage) = &parsed.usage {
                        debug!(
                            "OpenAI call succeeded: input_tokens={}, output_tokens={}",
                            usage.prompt_tokens, usage.completion_tokens
                        );
                    }
                    parsed.text()
                }
            };

            return text.ok_or(LlmError::EmptyContent);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

fn http_client(timeout: Duration) -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// How a request will obtain its generated text.
#[derive(Debug, Clone)]
pub enum Backend {
    Live(LlmClient),
    Demo,
}

impl Backend {
    pub fn mode(&self) -> &'static str {
        match self {
            Backend::Live(_) => "live",
            Backend::Demo => "demo",
        }
    }
}

/// Turns a provider choice into a usable backend, applying the configured
/// policy when no provider is available.
pub fn resolve_backend(
    choice: &ProviderChoice,
    env: &EnvironmentView,
    policy: NoProviderPolicy,
    settings: &ClientSettings,
) -> Result<Backend, AppError> {
    let client = match choice {
        ProviderChoice::Gemini { model } => LlmClient::gemini(env, model, settings),
        ProviderChoice::OpenAiCompatible { model, api_key } => {
            LlmClient::openai(model, api_key, settings)
        }
        ProviderChoice::Offline => {
            return match policy {
                NoProviderPolicy::Demo => {
                    info!("No LLM provider configured; serving demo content");
                    Ok(Backend::Demo)
                }
                NoProviderPolicy::Unavailable => Err(AppError::ServiceUnavailable(
                    "No LLM provider is configured. Set GEMINI_API_KEY or OPENAI_API_KEY."
                        .to_string(),
                )),
            };
        }
    };

    let client = client.map_err(|e| AppError::Llm(format!("Failed to build LLM client: {e}")))?;
    info!("Using {} model {}", choice.label(), client.model());
    Ok(Backend::Live(client))
}

#[cfg(test)]
mod tests {
    use super::provider::{select_provider, GEMINI_API_KEY, OPENAI_API_KEY};
    use super::*;

    fn settings() -> ClientSettings {
        ClientSettings {
            timeout: Duration::from_secs(5),
            openai_base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    #[test]
    fn test_settings_take_base_url_from_config() {
        let mut config = Config::for_tests();
        config.openai_base_url = "http://localhost:8080/v1".to_string();
        config.llm_timeout_secs = 7;
        let settings = ClientSettings::from_config(&config);
        assert_eq!(settings.openai_base_url, "http://localhost:8080/v1");
        assert_eq!(settings.timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_offline_with_demo_policy_is_demo() {
        let backend = resolve_backend(
            &ProviderChoice::Offline,
            &EnvironmentView::default(),
            NoProviderPolicy::Demo,
            &settings(),
        )
        .unwrap();
        assert!(matches!(backend, Backend::Demo));
        assert_eq!(backend.mode(), "demo");
    }

    #[test]
    fn test_offline_with_unavailable_policy_is_503() {
        let err = resolve_backend(
            &ProviderChoice::Offline,
            &EnvironmentView::default(),
            NoProviderPolicy::Unavailable,
            &settings(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_gemini_choice_builds_live_client_from_exported_key() {
        let mut env = EnvironmentView::from_pairs([(GEMINI_API_KEY, "g-key")]);
        let choice = select_provider(&mut env);
        let backend =
            resolve_backend(&choice, &env, NoProviderPolicy::Unavailable, &settings()).unwrap();
        match backend {
            Backend::Live(client) => assert_eq!(client.model(), "gemini-1.5-flash"),
            Backend::Demo => panic!("expected live backend"),
        }
    }

    #[test]
    fn test_gemini_client_without_exported_key_fails() {
        let err = LlmClient::gemini(&EnvironmentView::default(), "gemini-1.5-flash", &settings())
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingCredential(GOOGLE_API_KEY)));
    }

    #[test]
    fn test_openai_choice_builds_live_client() {
        let mut env = EnvironmentView::from_pairs([(OPENAI_API_KEY, "o-key")]);
        let choice = select_provider(&mut env);
        let backend = resolve_backend(&choice, &env, NoProviderPolicy::Demo, &settings()).unwrap();
        assert_eq!(backend.mode(), "live");
    }
}
