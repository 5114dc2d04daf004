//! MediPulse server entrypoint.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use medipulse::adapters::{GroqConfig, GroqProvider, InMemorySessionStore};
use medipulse::adapters::http::{intake_router, IntakeAppState};
use medipulse::config::AppConfig;
use medipulse::domain::intake::PromptCatalog;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    // A gap here is a build defect; refuse to start.
    if let Err(missing) = PromptCatalog::standard().validate() {
        return Err(format!("prompt catalog missing languages: {:?}", missing).into());
    }

    let groq_key = config
        .ai
        .groq_api_key
        .clone()
        .ok_or("GROQ_API_KEY is required")?;
    let provider = Arc::new(GroqProvider::new(
        GroqConfig::new(groq_key)
            .with_model(config.ai.model.clone())
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    ));

    let store = Arc::new(match config.intake.session_ttl() {
        Some(ttl) => InMemorySessionStore::with_ttl(ttl),
        None => InMemorySessionStore::new(),
    });

    let state = IntakeAppState::new(store, provider, config.intake.mode);

    let cors = build_cors(&config);
    let app = Router::new()
        .nest("/api/intake", intake_router(state))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors);

    let addr = config.server.socket_addr();
    tracing::info!(%addr, mode = ?config.intake.mode, "starting intake server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the CORS layer: configured origins, or permissive in development.
fn build_cors(config: &AppConfig) -> CorsLayer {
    let origins = config.server.cors_origins_list();
    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
