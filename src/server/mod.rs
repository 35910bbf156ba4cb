//! HTTP layer for the affective-state engine.
//!
//! Thin plumbing over [`crate::agent::EmotionalAgent`]; no engine logic lives
//! here.
//!
//! # Endpoints
//!
//! - `GET  /health` — Liveness probe
//! - `POST /chat`   — Process one interaction
//! - `GET  /state`  — Read-only affective snapshot

pub mod routes;

pub use routes::{app_router, AppState};
