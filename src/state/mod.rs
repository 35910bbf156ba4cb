//! Core affective state types.
//!
//! [`EmotionalState`] is a fixed record of eight bounded emotion channels plus
//! two meta-attributes (`maturity`, `temperament_bias_guilt`) and the timestamp
//! of the last decay application. Channels are addressed through the closed
//! [`Channel`] enum rather than string keys, so a typo is a compile error, not
//! a silently-defaulted lookup.
//!
//! [`ExperienceRecord`] is the immutable per-interaction snapshot kept in the
//! bounded experience log.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Clamp a channel value into the valid `[0, 1]` range.
pub(crate) fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// The eight emotion channels of the affective state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Joy,
    Guilt,
    Pride,
    Fear,
    Calm,
    Anxiety,
    Empathy,
    Resentment,
}

impl Channel {
    /// All channels, in canonical order.
    pub const ALL: [Channel; 8] = [
        Channel::Joy,
        Channel::Guilt,
        Channel::Pride,
        Channel::Fear,
        Channel::Calm,
        Channel::Anxiety,
        Channel::Empathy,
        Channel::Resentment,
    ];

    /// Canonical lowercase name, matching the persisted key.
    pub fn name(&self) -> &'static str {
        match self {
            Channel::Joy => "joy",
            Channel::Guilt => "guilt",
            Channel::Pride => "pride",
            Channel::Fear => "fear",
            Channel::Calm => "calm",
            Channel::Anxiety => "anxiety",
            Channel::Empathy => "empathy",
            Channel::Resentment => "resentment",
        }
    }

    /// Parse a persisted key back into a channel.
    pub fn from_name(name: &str) -> Option<Channel> {
        Channel::ALL.iter().copied().find(|c| c.name() == name)
    }
}

/// The agent's affective state.
///
/// Every channel value is kept in `[0, 1]` by the setters; `maturity` is
/// monotonically non-decreasing and never below 1.0; `last_update` only moves
/// forward (a regressed clock leaves it untouched).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalState {
    pub joy: f64,
    pub guilt: f64,
    pub pride: f64,
    pub fear: f64,
    pub calm: f64,
    pub anxiety: f64,
    pub empathy: f64,
    pub resentment: f64,
    /// Desensitisation factor: divides outcome deltas. Starts at 1.0 and only grows.
    pub maturity: f64,
    /// Per-agent multiplier on guilt deltas. Strictly positive.
    pub temperament_bias_guilt: f64,
    /// Timestamp of the last decay application.
    pub last_update: DateTime<Utc>,
}

impl EmotionalState {
    /// Canonical default state: every channel at a low 0.1 except `calm` at
    /// 0.5, `maturity` 1.0, neutral guilt temperament.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            joy: 0.1,
            guilt: 0.1,
            pride: 0.1,
            fear: 0.1,
            calm: 0.5,
            anxiety: 0.1,
            empathy: 0.1,
            resentment: 0.1,
            maturity: 1.0,
            temperament_bias_guilt: 1.0,
            last_update: now,
        }
    }

    /// Read a channel value.
    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Joy => self.joy,
            Channel::Guilt => self.guilt,
            Channel::Pride => self.pride,
            Channel::Fear => self.fear,
            Channel::Calm => self.calm,
            Channel::Anxiety => self.anxiety,
            Channel::Empathy => self.empathy,
            Channel::Resentment => self.resentment,
        }
    }

    /// Write a channel value, clamped to `[0, 1]`.
    pub fn set(&mut self, channel: Channel, value: f64) {
        let v = clamp01(value);
        match channel {
            Channel::Joy => self.joy = v,
            Channel::Guilt => self.guilt = v,
            Channel::Pride => self.pride = v,
            Channel::Fear => self.fear = v,
            Channel::Calm => self.calm = v,
            Channel::Anxiety => self.anxiety = v,
            Channel::Empathy => self.empathy = v,
            Channel::Resentment => self.resentment = v,
        }
    }

    /// Add `delta` to a channel, clamping the result to `[0, 1]`.
    pub fn nudge(&mut self, channel: Channel, delta: f64) {
        self.set(channel, self.get(channel) + delta);
    }

    /// Snapshot of all channels as an ordered name → value map.
    pub fn channel_map(&self) -> BTreeMap<String, f64> {
        Channel::ALL
            .iter()
            .map(|c| (c.name().to_string(), self.get(*c)))
            .collect()
    }
}

impl Default for EmotionalState {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// Immutable snapshot of one interaction, kept in the bounded experience log.
///
/// Never mutated after creation; used only as a read-only consistency signal
/// when composing the next instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub prompt: String,
    pub response_text: String,
    pub state_snapshot: BTreeMap<String, f64>,
    pub timestamp: DateTime<Utc>,
}

impl ExperienceRecord {
    pub fn new(
        prompt: &str,
        response_text: &str,
        state_snapshot: BTreeMap<String, f64>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            prompt: prompt.to_string(),
            response_text: response_text.to_string(),
            state_snapshot,
            timestamp,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
