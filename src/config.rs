//! Environment-driven configuration for the server binary.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 8080)
//! - `CONSCIENCE_DB` — SQLite database path (default: `conscience_state.db`)
//! - `GEMINI_API_KEY` — generation credential; absent means simulated mode
//! - `GEMINI_MODEL` — generation model (default: `gemini-2.5-flash`)
//! - `CONSCIENCE_LAMBDA` — `sigmoid` or `tiered` (default: `sigmoid`)

use std::path::PathBuf;

use crate::conscience::ConscienceVariant;
use crate::llm::DEFAULT_GEMINI_MODEL;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub lambda_variant: ConscienceVariant,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let db_path = std::env::var("CONSCIENCE_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("conscience_state.db"));

        let gemini_api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());

        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());

        let lambda_variant = match std::env::var("CONSCIENCE_LAMBDA") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{e}; falling back to sigmoid");
                ConscienceVariant::Sigmoid
            }),
            Err(_) => ConscienceVariant::Sigmoid,
        };

        Self {
            port,
            db_path,
            gemini_api_key,
            gemini_model,
            lambda_variant,
        }
    }
}
