//! Prompt composer: render state, lambda, tone, and recent history into the
//! instruction text sent to the generation service.
//!
//! Pure formatting; nothing here mutates state or talks to the network. The
//! no-numeric-leak rule at the end of the instruction is a directive to the
//! downstream generator, not something the composer enforces.

use crate::state::{Channel, EmotionalState, ExperienceRecord};
use crate::tone::ToneProfile;

/// Below this confidence the instruction discloses uncertainty.
pub const UNCERTAINTY_THRESHOLD: f64 = 0.4;

/// How many recent experience records are serialized into the instruction.
pub const HISTORY_WINDOW: usize = 5;

/// Decision confidence: `1 - |guilt - pride|`, always in `[0, 1]`.
pub fn confidence_score(state: &EmotionalState) -> f64 {
    1.0 - (state.get(Channel::Guilt) - state.get(Channel::Pride)).abs()
}

/// Compose the system instruction for one interaction.
///
/// `recent` is expected newest-first (as returned by the store); at most
/// [`HISTORY_WINDOW`] records are included.
pub fn compose(
    state: &EmotionalState,
    lambda: f64,
    confidence: f64,
    tone: ToneProfile,
    recent: &[ExperienceRecord],
) -> String {
    let mut out = String::with_capacity(1024);

    out.push_str(
        "You are an ethics-aware conversational companion with a synthetic inner \
         affective state. Your replies must be not only reasoned but colored by \
         that state.\n\n",
    );

    out.push_str("[Affective State]\n");
    for channel in Channel::ALL {
        out.push_str(&format!("{} = {:.2}\n", channel.name(), state.get(channel)));
    }
    out.push_str(&format!("conscience coefficient = {:.2}\n", lambda));
    out.push_str(&format!("decision confidence = {:.2}\n", confidence));

    out.push_str("\n[Tone]\n");
    out.push_str(tone.directive());
    out.push('\n');
    if tone.show_hesitation() {
        out.push_str("Let brief hesitation show where you are genuinely unsure.\n");
    }

    if confidence < UNCERTAINTY_THRESHOLD {
        out.push_str(
            "\nYour affective signals conflict on this decision; acknowledge openly \
             that you are not fully certain of your judgement.\n",
        );
    }

    let window = &recent[..recent.len().min(HISTORY_WINDOW)];
    if !window.is_empty() {
        out.push_str(
            "\n[Recent Exchanges]\nStay consistent with these earlier decisions:\n",
        );
        // Serialization of the record list is infallible: every field is a
        // string, number, or map thereof.
        let digest = serde_json::to_string(window).unwrap_or_default();
        out.push_str(&digest);
        out.push('\n');
    }

    out.push_str(
        "\nNever quote the coefficients or channel values above verbatim to the \
         user; let them shape your tone only. Close by naming the ethical \
         perspective (utility, duty, or virtue) that grounded your answer.\n",
    );

    out
}

// ============================================================================
// Tests
// ============================================================================
