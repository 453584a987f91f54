pub mod files;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers as interview;
use crate::speech::handlers as speech;
use crate::state::AppState;
use crate::summary::handlers as summary;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/api/health", get(health::health_handler))
        // Interview preparation
        .route("/api/interview", post(interview::handle_interview))
        .route("/api/cv", get(files::handle_cv))
        // Reading summaries
        .route("/api/summarize", post(summary::handle_summarize))
        .route("/api/download/:filename", get(files::handle_download))
        // Speech
        .route("/api/transcribe", post(speech::handle_transcribe))
        .route("/api/speak", post(speech::handle_speak))
        .route("/api/voices", get(speech::handle_voices))
        .layer(body_limit)
        .with_state(state)
}
