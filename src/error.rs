//! Error taxonomy for the affective-state engine.
//!
//! - Missing generation credentials are not an error: the agent runs in
//!   simulated mode for the process lifetime.
//! - [`GenerationError`] is recovered locally by the agent; the state update
//!   still completes and a placeholder response is returned.
//! - [`StoreError`] during a request is fatal for that request but never
//!   corrupts the in-memory state.
//! - A malformed stored value is recovered per channel inside the store load
//!   path and never surfaces here.

use thiserror::Error;

/// Persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text-generation collaborator failures. Never retried by the core.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("generation service returned no text")]
    EmptyResponse,
}

/// Failures surfaced by [`crate::agent::EmotionalAgent`] operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("persistence failure: {0}")]
    Store(#[from] StoreError),
}
