//! The emotional agent: one owning object per agent identity.
//!
//! Owns the live [`EmotionalState`], the durable store, and the optional
//! generation client; constructed once by the composition root and handed by
//! reference into the transport layer. The engine is a sequential
//! single-writer state machine: concurrent callers must serialize access (the
//! HTTP layer holds one async mutex per agent).
//!
//! Per interaction: decay for elapsed time, apply the outcome event, derive
//! lambda and tone, compose the instruction, call generation (recovering
//! locally on failure), persist, append the experience record.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::conscience::ConscienceVariant;
use crate::decay::{apply_decay, DecayPolicy};
use crate::error::EngineError;
use crate::llm::{failure_response, simulated_response, TextGenerator};
use crate::outcome::{apply_outcome, Outcome};
use crate::prompt::{compose, confidence_score, HISTORY_WINDOW};
use crate::state::{EmotionalState, ExperienceRecord};
use crate::store::StateStore;
use crate::tone::{select_tone, ToneProfile};

/// Result of one processed interaction.
#[derive(Debug, Clone)]
pub struct InteractionOutcome {
    pub response_text: String,
    pub new_state: BTreeMap<String, f64>,
    pub lambda_value: f64,
    pub confidence_score: f64,
    pub tone: ToneProfile,
}

pub struct EmotionalAgent {
    state: EmotionalState,
    store: Box<dyn StateStore>,
    /// `None` means no generation credential was configured: the agent runs
    /// in simulated mode for the process lifetime.
    generator: Option<Box<dyn TextGenerator>>,
    variant: ConscienceVariant,
    decay_policy: DecayPolicy,
}

impl EmotionalAgent {
    /// Load the persisted state (or the canonical default) and build the agent.
    pub fn new(
        store: Box<dyn StateStore>,
        generator: Option<Box<dyn TextGenerator>>,
        variant: ConscienceVariant,
    ) -> Result<Self, EngineError> {
        let state = store.load()?;
        Ok(Self {
            state,
            store,
            generator,
            variant,
            decay_policy: DecayPolicy::default(),
        })
    }

    /// Read-only snapshot of the channel values. No side effects.
    pub fn current_state(&self) -> BTreeMap<String, f64> {
        self.state.channel_map()
    }

    /// Process one interaction end to end.
    ///
    /// The state update is independent of generation: a failed generation
    /// call yields a placeholder response but the mutated state is still
    /// persisted. A persistence failure is fatal for the request; the
    /// in-memory state remains the latest valid snapshot.
    pub async fn process_interaction(
        &mut self,
        user_prompt: &str,
        action_is_ethical: bool,
        reward_magnitude: f64,
        user_tone_is_critical: bool,
    ) -> Result<InteractionOutcome, EngineError> {
        let now = Utc::now();
        apply_decay(&mut self.state, now, &self.decay_policy);
        apply_outcome(
            &mut self.state,
            &Outcome {
                ethical: action_is_ethical,
                reward_magnitude,
                critical_tone: user_tone_is_critical,
            },
        );

        let lambda = self.variant.lambda(&self.state);
        let tone = select_tone(&self.state, lambda);
        let confidence = confidence_score(&self.state);

        // The consistency digest is advisory; a failed read degrades the
        // instruction, not the request.
        let recent = self
            .store
            .recent_experiences(HISTORY_WINDOW)
            .unwrap_or_else(|e| {
                tracing::warn!("could not read experience log: {e}");
                Vec::new()
            });
        let instruction = compose(&self.state, lambda, confidence, tone, &recent);

        let response_text = match &self.generator {
            None => simulated_response(lambda, user_prompt),
            Some(generator) => match generator.generate(&instruction, user_prompt).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("generation failed, substituting placeholder: {e}");
                    failure_response(lambda, &e)
                }
            },
        };

        self.store.save(&self.state)?;
        let record =
            ExperienceRecord::new(user_prompt, &response_text, self.state.channel_map(), now);
        self.store.append_experience(&record)?;

        tracing::debug!(
            lambda,
            confidence,
            tone = tone.name(),
            "interaction processed"
        );

        Ok(InteractionOutcome {
            response_text,
            new_state: self.state.channel_map(),
            lambda_value: lambda,
            confidence_score: confidence,
            tone,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
