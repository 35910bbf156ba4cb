//! Conscience calculator: distil the state into the scalar lambda.
//!
//! Two interchangeable variants sit behind [`ConscienceVariant`]. Their
//! codomains differ and callers must not assume a common range:
//!
//! - [`ConscienceVariant::Sigmoid`] is strictly within `(0, 1)`.
//! - [`ConscienceVariant::Tiered`] has a floor of 1.0 and no upper bound.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::state::{Channel, EmotionalState};

/// Smoothing constant for the sigmoid variant: `1 / (1 + exp(-w / 4))`.
pub const SIGMOID_SMOOTHING: f64 = 4.0;

/// Selectable lambda strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConscienceVariant {
    #[default]
    Sigmoid,
    Tiered,
}

impl ConscienceVariant {
    /// Compute lambda for the current state. Pure, no randomness.
    pub fn lambda(&self, state: &EmotionalState) -> f64 {
        match self {
            ConscienceVariant::Sigmoid => sigmoid_lambda(state),
            ConscienceVariant::Tiered => tiered_lambda(state),
        }
    }
}

impl FromStr for ConscienceVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sigmoid" => Ok(ConscienceVariant::Sigmoid),
            "tiered" => Ok(ConscienceVariant::Tiered),
            other => Err(format!("unknown conscience variant '{other}'")),
        }
    }
}

/// Sigmoid aggregation over the positive and negative affect triples.
///
/// Positive affect is `pride + joy + empathy`, negative is
/// `guilt + fear + resentment` (the channel-superset pairing; see DESIGN.md).
fn sigmoid_lambda(state: &EmotionalState) -> f64 {
    let positive = state.get(Channel::Pride) + state.get(Channel::Joy) + state.get(Channel::Empathy);
    let negative =
        state.get(Channel::Guilt) + state.get(Channel::Fear) + state.get(Channel::Resentment);
    let weighted = positive * 1.5 - negative * 2.0;
    1.0 / (1.0 + (-weighted / SIGMOID_SMOOTHING).exp())
}

/// Tiered aggregation over guilt, fear, and pride.
///
/// The guilt term switches shape at `G = 0.5`: cubic above, linear below.
/// The resulting discontinuity at the boundary is a known kink carried over
/// from the source behavior, not smoothed away.
fn tiered_lambda(state: &EmotionalState) -> f64 {
    let g = state.get(Channel::Guilt);
    let f = state.get(Channel::Fear);
    let p = state.get(Channel::Pride);

    let guilt_term = if g > 0.5 { g.powi(3) * 8.0 } else { g * 1.5 };
    let fear_term = f * 2.0;
    let pride_reduction = p * 0.5;

    (1.0 + guilt_term + fear_term - pride_reduction).max(1.0)
}

// ============================================================================
// Tests
// ============================================================================
