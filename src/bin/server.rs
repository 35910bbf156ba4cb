//! conscience HTTP server binary.
//!
//! Starts an axum HTTP server exposing the emotionally-aware chat endpoints.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 8080)
//! - `CONSCIENCE_DB` — SQLite database path (default: `conscience_state.db`)
//! - `GEMINI_API_KEY` — generation credential; absent means simulated mode
//! - `GEMINI_MODEL` — generation model (default: `gemini-2.5-flash`)
//! - `CONSCIENCE_LAMBDA` — lambda variant: `sigmoid` (default) or `tiered`
//! - `RUST_LOG` — tracing filter (default: `info,conscience=debug`)
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use anyhow::Context;

use conscience::config::Config;
use conscience::llm::{GeminiClient, TextGenerator};
use conscience::server::{app_router, AppState};
use conscience::store::SqliteStateStore;
use conscience::EmotionalAgent;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,conscience=debug".into()),
        )
        .init();

    let config = Config::from_env();

    let store = SqliteStateStore::new(config.db_path.clone())
        .with_context(|| format!("failed to open state store at {:?}", config.db_path))?;

    let generator: Option<Box<dyn TextGenerator>> = match &config.gemini_api_key {
        Some(key) => {
            tracing::info!("generation enabled via Gemini model {}", config.gemini_model);
            Some(Box::new(GeminiClient::new(
                key.clone(),
                config.gemini_model.clone(),
            )?))
        }
        None => {
            tracing::warn!(
                "GEMINI_API_KEY not set; running in simulated mode for the process lifetime"
            );
            None
        }
    };

    let agent = EmotionalAgent::new(Box::new(store), generator, config.lambda_variant)
        .context("failed to load emotional state")?;

    let app = app_router(AppState::new(agent));
    let bind_addr = format!("0.0.0.0:{}", config.port);

    tracing::info!("conscience server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health — liveness probe");
    tracing::info!("  POST /chat   — process an interaction");
    tracing::info!("  GET  /state  — affective snapshot");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
