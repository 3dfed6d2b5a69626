mod config;
mod errors;
mod llm_client;
mod routes;
mod state;
mod talking_points;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{AnthropicClient, BedrockClient, Provider, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={level},tower_http={level}",
                env!("CARGO_CRATE_NAME"),
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Audience API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the generation backend
    let generator = build_generator(&config).await?;
    info!(
        "LLM client initialized (provider: {}, model: {})",
        config.provider,
        generator.model()
    );

    let state = AppState { generator };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs the generator selected by `LLM_PROVIDER`.
async fn build_generator(config: &Config) -> Result<Arc<dyn TextGenerator>> {
    let settings = config.generation.clone();

    let generator: Arc<dyn TextGenerator> = match config.provider {
        Provider::Bedrock => {
            info!("Using Amazon Bedrock in region {}", config.aws_region);
            Arc::new(BedrockClient::from_env(&config.aws_region, settings).await)
        }
        Provider::Anthropic => {
            let api_key = config
                .anthropic_api_key
                .clone()
                .context("ANTHROPIC_API_KEY is required for the anthropic provider")?;
            Arc::new(
                AnthropicClient::new(api_key, settings)
                    .context("Failed to build Anthropic HTTP client")?,
            )
        }
    };

    Ok(generator)
}
