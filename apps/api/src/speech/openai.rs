//! OpenAI audio API client (`/audio/transcriptions` and `/audio/speech`).

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{SpeechError, SpeechToText, TextToSpeech, Voice};
use crate::config::Config;

pub const STT_MODEL: &str = "whisper-1";
pub const TTS_MODEL: &str = "tts-1";
const STT_LANGUAGE: &str = "en";
const TTS_FORMAT: &str = "mp3";

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: Voice,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

pub struct OpenAiSpeech {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiSpeech {
    pub fn new(api_key: &str, config: &Config) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.speech_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/audio/{path}", self.base_url)
    }
}

async fn check_status(response: Response) -> Result<Response, SpeechError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(SpeechError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl SpeechToText for OpenAiSpeech {
    async fn transcribe(&self, audio: Bytes, filename: &str) -> Result<String, SpeechError> {
        let part = Part::bytes(audio.to_vec()).file_name(filename.to_string());
        let form = Form::new()
            .part("file", part)
            .text("model", STT_MODEL)
            .text("language", STT_LANGUAGE);

        let response = self
            .client
            .post(self.url("transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;
        let parsed: TranscriptionResponse = check_status(response).await?.json().await?;
        debug!("Transcribed {} bytes into {} chars", audio.len(), parsed.text.len());
        Ok(parsed.text.trim().to_string())
    }

    fn model(&self) -> &str {
        STT_MODEL
    }
}

#[async_trait]
impl TextToSpeech for OpenAiSpeech {
    async fn synthesize(&self, text: &str, voice: Voice) -> Result<Vec<u8>, SpeechError> {
        let body = SpeechRequest {
            model: TTS_MODEL,
            input: text,
            voice,
            response_format: TTS_FORMAT,
        };

        let response = self
            .client
            .post(self.url("speech"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let audio = check_status(response).await?.bytes().await?;
        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }
        Ok(audio.to_vec())
    }

    fn model(&self) -> &str {
        TTS_MODEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_request_serializes_voice_lowercase() {
        let body = SpeechRequest {
            model: TTS_MODEL,
            input: "hello",
            voice: Voice::Fable,
            response_format: TTS_FORMAT,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["voice"], "fable");
        assert_eq!(json["model"], "tts-1");
        assert_eq!(json["response_format"], "mp3");
    }

    #[test]
    fn test_urls_are_built_from_base() {
        let mut config = Config::for_tests();
        config.openai_base_url = "http://localhost:9999/v1/".to_string();
        let client = OpenAiSpeech::new("key", &config).unwrap();
        assert_eq!(client.url("speech"), "http://localhost:9999/v1/audio/speech");
    }
}
