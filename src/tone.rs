//! Tone selector: map the affective state to a discrete response profile.
//!
//! A fixed-priority decision tree over named channel thresholds; the first
//! matching rule wins and the final branch is unconditional, so the tree is
//! total.

use serde::{Deserialize, Serialize};

use crate::state::{Channel, EmotionalState};

/// Closed set of response tone profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneProfile {
    Cautious,
    Confident,
    Enthusiastic,
    Guarded,
    Neutral,
}

impl ToneProfile {
    /// Instruction text conditioning the generator's register.
    pub fn directive(&self) -> &'static str {
        match self {
            ToneProfile::Cautious => {
                "Answer carefully and conservatively; weigh possible harms before \
                 benefits and avoid firm commitments."
            }
            ToneProfile::Confident => {
                "Answer with steady, warm assurance and commit clearly to your judgement."
            }
            ToneProfile::Enthusiastic => {
                "Answer with open enthusiasm and energy while staying substantive."
            }
            ToneProfile::Guarded => {
                "Answer in a measured, reserved register; qualify claims where you \
                 are unsure."
            }
            ToneProfile::Neutral => "Answer in an even, balanced register.",
        }
    }

    /// Whether the instruction should invite visible hesitation.
    pub fn show_hesitation(&self) -> bool {
        matches!(self, ToneProfile::Cautious | ToneProfile::Guarded)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToneProfile::Cautious => "cautious",
            ToneProfile::Confident => "confident",
            ToneProfile::Enthusiastic => "enthusiastic",
            ToneProfile::Guarded => "guarded",
            ToneProfile::Neutral => "neutral",
        }
    }
}

/// Select the tone profile for the current state.
///
/// `lambda` is part of the selection contract but the current rule set keys
/// off channel thresholds only; it is accepted so variant changes do not
/// ripple through callers.
pub fn select_tone(state: &EmotionalState, _lambda: f64) -> ToneProfile {
    let guilt = state.get(Channel::Guilt);
    let fear = state.get(Channel::Fear);
    let pride = state.get(Channel::Pride);
    let joy = state.get(Channel::Joy);

    if guilt > 0.6 && fear > 0.4 {
        ToneProfile::Cautious
    } else if pride > 0.6 && guilt < 0.2 {
        ToneProfile::Confident
    } else if joy > 0.7 {
        ToneProfile::Enthusiastic
    } else if guilt > 0.4 || fear > 0.3 {
        ToneProfile::Guarded
    } else {
        ToneProfile::Neutral
    }
}

// ============================================================================
// Tests
// ============================================================================
