//! Speech capabilities: transcription (speech-to-text) and synthesis (text-to-speech).
//!
//! Both are built once at startup and carried in `AppState`. A backend that
//! cannot be constructed is stored as `Capability::Unavailable(reason)` and
//! the matching endpoints answer 503 instead of failing at startup.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::provider::{EnvironmentView, OPENAI_API_KEY};

pub mod handlers;
pub mod openai;

/// Longest text sent for synthesis; longer input is cut and marked with `...`.
pub const MAX_TTS_CHARS: usize = 4000;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("speech service returned no audio")]
    EmptyAudio,
}

#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: Bytes, filename: &str) -> Result<String, SpeechError>;
    fn model(&self) -> &str;
}

#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Returns encoded audio (mp3).
    async fn synthesize(&self, text: &str, voice: Voice) -> Result<Vec<u8>, SpeechError>;
    fn model(&self) -> &str;
}

/// A speech backend that is either ready or known to be missing.
pub enum Capability<T: ?Sized> {
    Available(Arc<T>),
    Unavailable(String),
}

impl<T: ?Sized> Clone for Capability<T> {
    fn clone(&self) -> Self {
        match self {
            Capability::Available(inner) => Capability::Available(Arc::clone(inner)),
            Capability::Unavailable(reason) => Capability::Unavailable(reason.clone()),
        }
    }
}

impl<T: ?Sized> Capability<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }

    /// The backend, or a 503 carrying the reason it is missing.
    pub fn get(&self) -> Result<&Arc<T>, AppError> {
        match self {
            Capability::Available(inner) => Ok(inner),
            Capability::Unavailable(reason) => Err(AppError::ServiceUnavailable(reason.clone())),
        }
    }
}

/// Voices offered by the synthesis backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Nova,
    Alloy,
    Echo,
    Fable,
    Onyx,
    Shimmer,
}

impl Voice {
    pub const ALL: [Voice; 6] = [
        Voice::Nova,
        Voice::Alloy,
        Voice::Echo,
        Voice::Fable,
        Voice::Onyx,
        Voice::Shimmer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Voice::Nova => "nova",
            Voice::Alloy => "alloy",
            Voice::Echo => "echo",
            Voice::Fable => "fable",
            Voice::Onyx => "onyx",
            Voice::Shimmer => "shimmer",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Voice::Nova => "Female, warm and friendly",
            Voice::Alloy => "Neutral, clear and professional",
            Voice::Echo => "Male, warm and expressive",
            Voice::Fable => "Male, deep and authoritative",
            Voice::Onyx => "Male, deep and smooth",
            Voice::Shimmer => "Female, soft and gentle",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Voice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Voice::ALL
            .into_iter()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| format!("Unknown voice '{}'", s.trim()))
    }
}

/// Speech backends shared by all handlers.
#[derive(Clone)]
pub struct SpeechServices {
    pub stt: Capability<dyn SpeechToText>,
    pub tts: Capability<dyn TextToSpeech>,
    pub default_voice: Voice,
}

impl SpeechServices {
    /// Builds the OpenAI-backed services when `OPENAI_API_KEY` is set;
    /// otherwise both capabilities are unavailable.
    pub fn from_config(config: &Config) -> Self {
        let default_voice = config.tts_voice.parse().unwrap_or_else(|e| {
            warn!("{e}; falling back to {}", Voice::Nova);
            Voice::Nova
        });

        let env = EnvironmentView::from_process();
        let Some(api_key) = env.get(OPENAI_API_KEY) else {
            return Self::unavailable(
                "Speech services require OPENAI_API_KEY to be set",
                default_voice,
            );
        };

        match openai::OpenAiSpeech::new(api_key, config) {
            Ok(client) => {
                info!(
                    "Speech services initialized (stt: {}, tts: {})",
                    openai::STT_MODEL,
                    openai::TTS_MODEL
                );
                let client = Arc::new(client);
                let stt: Arc<dyn SpeechToText> = client.clone();
                let tts: Arc<dyn TextToSpeech> = client;
                Self {
                    stt: Capability::Available(stt),
                    tts: Capability::Available(tts),
                    default_voice,
                }
            }
            Err(e) => Self::unavailable(
                &format!("Speech client could not be initialized: {e}"),
                default_voice,
            ),
        }
    }

    pub fn unavailable(reason: &str, default_voice: Voice) -> Self {
        warn!("{reason}");
        Self {
            stt: Capability::Unavailable(reason.to_string()),
            tts: Capability::Unavailable(reason.to_string()),
            default_voice,
        }
    }
}

/// Text ready for synthesis and whether it had to be shortened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechText {
    pub text: String,
    pub truncated: bool,
}

pub fn prepare_speech_text(text: &str) -> Result<SpeechText, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "No text provided for speech synthesis".to_string(),
        ));
    }
    Ok(match text.char_indices().nth(MAX_TTS_CHARS) {
        Some((cut, _)) => SpeechText {
            text: format!("{}...", &text[..cut]),
            truncated: true,
        },
        None => SpeechText {
            text: text.to_string(),
            truncated: false,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_parses_case_insensitively() {
        assert_eq!("Shimmer".parse::<Voice>().unwrap(), Voice::Shimmer);
        assert_eq!(" nova ".parse::<Voice>().unwrap(), Voice::Nova);
        assert!("robot".parse::<Voice>().is_err());
    }

    #[test]
    fn test_voice_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Voice::Onyx).unwrap(), "onyx");
    }

    #[test]
    fn test_unavailable_capability_is_503() {
        let cap: Capability<dyn TextToSpeech> = Capability::Unavailable("no key".to_string());
        assert!(!cap.is_available());
        assert!(matches!(cap.get(), Err(AppError::ServiceUnavailable(msg)) if msg == "no key"));
    }

    #[test]
    fn test_blank_speech_text_is_rejected() {
        assert!(matches!(
            prepare_speech_text("   "),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_short_speech_text_is_untouched() {
        let prepared = prepare_speech_text("Hello there").unwrap();
        assert_eq!(prepared.text, "Hello there");
        assert!(!prepared.truncated);
    }

    #[test]
    fn test_long_speech_text_is_truncated() {
        let text = "b".repeat(MAX_TTS_CHARS + 1);
        let prepared = prepare_speech_text(&text).unwrap();
        assert!(prepared.truncated);
        assert_eq!(prepared.text.len(), MAX_TTS_CHARS + 3);
        assert!(prepared.text.ends_with("..."));
    }

    #[test]
    fn test_unavailable_services_keep_default_voice() {
        let services = SpeechServices::unavailable("offline", Voice::Echo);
        assert!(!services.stt.is_available());
        assert!(!services.tts.is_available());
        assert_eq!(services.default_voice, Voice::Echo);
    }
}
