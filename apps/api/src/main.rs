mod config;
mod errors;
mod interview;
mod llm_client;
mod profile;
mod routes;
mod speech;
mod state;
mod summary;
mod uploads;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::provider::{select_provider, EnvironmentView};
use crate::routes::build_router;
use crate::speech::SpeechServices;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Assistant API v{}", env!("CARGO_PKG_VERSION"));

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload dir {}", config.upload_dir.display()))?;

    // Provider is chosen per request; log what the current environment would pick
    let startup_choice = select_provider(&mut EnvironmentView::from_process());
    info!(
        "LLM provider at startup: {} (no-provider policy: {:?})",
        startup_choice.label(),
        config.no_provider_policy
    );

    let speech = SpeechServices::from_config(&config);

    let state = AppState::new(config.clone(), speech);
    info!("Interest profile: {}", state.interests);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
