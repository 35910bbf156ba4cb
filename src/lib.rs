//! # Conscience
//!
//! An affective-state engine for a conversational agent: a small vector of
//! bounded emotional intensities that decays over time, is perturbed by
//! discrete ethical-outcome events, and is distilled into a single scalar
//! (the conscience coefficient) used to steer the tone of generated text.
//!
//! The core is the decay function, the event-driven update rule, the scalar
//! derivation, and the tone-selection mapping; the HTTP layer, the generation
//! call, and persistence are thin collaborators around it.

pub mod agent;
pub mod config;
pub mod conscience;
pub mod decay;
pub mod error;
pub mod llm;
pub mod outcome;
pub mod prompt;
pub mod server;
pub mod state;
pub mod store;
pub mod tone;

pub use agent::{EmotionalAgent, InteractionOutcome};
pub use conscience::ConscienceVariant;
pub use state::{Channel, EmotionalState, ExperienceRecord};
pub use tone::ToneProfile;

/// Library version.
pub const VERSION: &str = "0.4.0";
