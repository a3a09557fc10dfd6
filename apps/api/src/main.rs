mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod stages;
mod state;
mod workflow;

use anyhow::Result;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

/// How often idle sessions are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Hire API v{}", env!("CARGO_PKG_VERSION"));

    if config.llm_api_key.is_none() {
        warn!("LLM_API_KEY is not set; pipeline requests will fail until it is configured");
    }
    if config.service_api_key.is_none() {
        warn!("SERVICE_API_KEY is not set; /api/v1 routes are open");
    }

    let state = AppState::from_config(config.clone());
    info!(
        "LLM client initialized (model: {}, endpoint: {})",
        state.runner.model(),
        config.llm_api_url
    );

    let ttl = chrono::Duration::minutes(config.session_ttl_minutes);
    state.workflow.spawn_idle_sweeper(ttl, SWEEP_INTERVAL);
    info!(
        "Sessions expire after {} idle minutes",
        config.session_ttl_minutes
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
