//! Decay engine: advance the affective state to the current time.
//!
//! Each channel belongs to a declared decay class with its own daily
//! retention. Decay is exponential in elapsed wall-clock time, computed
//! lazily at the moment of the next access; there is no running clock.
//!
//! Class assignment is a total, explicit mapping:
//!
//! | class    | channels            | daily retention |
//! |----------|---------------------|-----------------|
//! | Negative | guilt, fear         | 0.98            |
//! | Positive | joy, pride          | 0.95            |
//! | Ambient  | anxiety, resentment | 0.99            |
//! | Hold     | calm, empathy       | unchanged       |

use chrono::{DateTime, Utc};

use crate::state::{Channel, EmotionalState};

/// Seconds in one day, the unit the retention constants are expressed in.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Decay class of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecayClass {
    /// Negative affect: guilt, fear.
    Negative,
    /// Positive affect: joy, pride.
    Positive,
    /// Background affect: anxiety, resentment.
    Ambient,
    /// Unchanged by the passage of time: calm, empathy.
    Hold,
}

/// Declared class of every channel. Total by construction.
pub fn class_of(channel: Channel) -> DecayClass {
    match channel {
        Channel::Guilt | Channel::Fear => DecayClass::Negative,
        Channel::Joy | Channel::Pride => DecayClass::Positive,
        Channel::Anxiety | Channel::Resentment => DecayClass::Ambient,
        Channel::Calm | Channel::Empathy => DecayClass::Hold,
    }
}

/// Per-class daily retention fractions.
///
/// A retention of 0.98 means a channel keeps 98% of its value over 24 hours.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayPolicy {
    pub daily_retention_negative: f64,
    pub daily_retention_positive: f64,
    pub daily_retention_ambient: f64,
}

impl Default for DecayPolicy {
    fn default() -> Self {
        Self {
            daily_retention_negative: 0.98,
            daily_retention_positive: 0.95,
            daily_retention_ambient: 0.99,
        }
    }
}

impl DecayPolicy {
    /// Per-second decay rate for a class, or `None` for `Hold`.
    ///
    /// `k = -ln(retention) / 86400`, so `exp(-k * 86400) == retention`.
    pub fn rate(&self, class: DecayClass) -> Option<f64> {
        let retention = match class {
            DecayClass::Negative => self.daily_retention_negative,
            DecayClass::Positive => self.daily_retention_positive,
            DecayClass::Ambient => self.daily_retention_ambient,
            DecayClass::Hold => return None,
        };
        Some(-retention.ln() / SECONDS_PER_DAY)
    }
}

/// Apply decay for the wall-clock time elapsed since `state.last_update`.
///
/// A regressed clock (`now < last_update`) is treated as zero elapsed time:
/// no negative decay is ever applied and `last_update` is left untouched, so
/// it stays monotonically non-decreasing. Idempotent when no time has passed.
pub fn apply_decay(state: &mut EmotionalState, now: DateTime<Utc>, policy: &DecayPolicy) {
    let elapsed_ms = (now - state.last_update).num_milliseconds();
    if elapsed_ms <= 0 {
        return;
    }
    let dt = elapsed_ms as f64 / 1000.0;

    for channel in Channel::ALL {
        if let Some(k) = policy.rate(class_of(channel)) {
            let decayed = state.get(channel) * (-k * dt).exp();
            state.set(channel, decayed);
        }
    }
    state.last_update = now;
}

// ============================================================================
// Tests
// ============================================================================
