//! Axum route handlers for transcription, synthesis and the voice catalogue.

use axum::{
    extract::{Multipart, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::speech::{prepare_speech_text, Voice};
use crate::state::AppState;
use crate::uploads::{read_file_field, sanitize_filename};

const AUDIO_FIELD: &str = "audio";
const DEFAULT_AUDIO_NAME: &str = "recording.webm";

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub success: bool,
    pub text: String,
}

/// POST /api/transcribe
///
/// Multipart upload of a recorded answer under the `audio` field.
pub async fn handle_transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>, AppError> {
    let stt = state.speech.stt.get()?.clone();

    let upload = read_file_field(&mut multipart, AUDIO_FIELD)
        .await?
        .ok_or_else(|| AppError::Validation("No audio file uploaded".to_string()))?;
    if upload.data.is_empty() {
        return Err(AppError::Validation("Audio file is empty".to_string()));
    }

    let filename = match sanitize_filename(&upload.filename) {
        name if name.is_empty() => DEFAULT_AUDIO_NAME.to_string(),
        name => name,
    };
    let size = upload.data.len();
    let text = stt
        .transcribe(upload.data, &filename)
        .await
        .map_err(|e| AppError::Speech(format!("Transcription failed: {e}")))?;
    info!("Transcribed {filename} ({size} bytes) with {}", stt.model());

    Ok(Json(TranscribeResponse {
        success: true,
        text,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    #[serde(default)]
    pub text: String,
    pub voice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SpeakResponse {
    pub success: bool,
    /// Base64-encoded audio.
    pub audio: String,
    pub format: &'static str,
    pub voice: Voice,
    pub truncated: bool,
}

/// POST /api/speak
pub async fn handle_speak(
    State(state): State<AppState>,
    Json(request): Json<SpeakRequest>,
) -> Result<Json<SpeakResponse>, AppError> {
    let tts = state.speech.tts.get()?.clone();

    let prepared = prepare_speech_text(&request.text)?;
    let voice = match request.voice.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.parse::<Voice>().map_err(AppError::Validation)?,
        _ => state.speech.default_voice,
    };

    let audio = tts
        .synthesize(&prepared.text, voice)
        .await
        .map_err(|e| AppError::Speech(format!("Speech synthesis failed: {e}")))?;
    info!(
        "Synthesized {} chars with {} voice {voice} ({} bytes)",
        prepared.text.chars().count(),
        tts.model(),
        audio.len()
    );

    Ok(Json(SpeakResponse {
        success: true,
        audio: STANDARD.encode(audio),
        format: "mp3",
        voice,
        truncated: prepared.truncated,
    }))
}

#[derive(Debug, Serialize)]
pub struct VoiceInfo {
    pub id: Voice,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceInfo>,
    pub default: Voice,
    pub available: bool,
}

/// GET /api/voices
///
/// Always answers; `available` reports whether synthesis is configured.
pub async fn handle_voices(State(state): State<AppState>) -> Json<VoicesResponse> {
    let voices = Voice::ALL
        .into_iter()
        .map(|id| VoiceInfo {
            id,
            description: id.description(),
        })
        .collect();

    Json(VoicesResponse {
        voices,
        default: state.speech.default_voice,
        available: state.speech.tts.is_available(),
    })
}
