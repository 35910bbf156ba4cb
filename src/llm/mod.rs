//! Text-generation collaborator.
//!
//! The engine talks to generation through the [`TextGenerator`] seam.
//! [`GeminiClient`] is the real implementation over the Gemini
//! `generateContent` REST endpoint; when no API key is configured the agent
//! carries no generator at all and answers through [`simulated_response`]
//! for the whole process lifetime. Generation failures are never retried
//! here; the agent substitutes [`failure_response`] and moves on.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GenerationError;

/// Default Gemini model when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Request timeout for the generation call.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Opaque text-generation service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a response conditioned on the composed system instruction.
    async fn generate(
        &self,
        instruction: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError>;
}

/// Gemini REST client. One attempt per call; no retries.
pub struct GeminiClient {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            api_key,
            model,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        )
    }

    fn build_request_body(instruction: &str, user_prompt: &str) -> Value {
        serde_json::json!({
            "system_instruction": {
                "parts": [{ "text": instruction }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": user_prompt }]
            }]
        })
    }

    fn extract_text(response: &Value) -> Option<String> {
        response
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .get(0)?
            .get("text")?
            .as_str()
            .map(|s| s.to_string())
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        instruction: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError> {
        log::debug!(
            "GeminiClient.generate: model={}, instruction={}B, prompt={}B",
            self.model,
            instruction.len(),
            user_prompt.len(),
        );

        let body = Self::build_request_body(instruction, user_prompt);
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: text.chars().take(500).collect(),
            });
        }

        let json: Value = serde_json::from_str(&text).map_err(|e| GenerationError::Api {
            status: status.as_u16(),
            message: format!("unparseable response body: {e}"),
        })?;

        if let Some(error) = json.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown Gemini API error")
                .to_string();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Self::extract_text(&json).ok_or(GenerationError::EmptyResponse)
    }
}

/// Deterministic fallback used when no generation service is configured.
///
/// Embeds the lambda value and varies the register by its band.
pub fn simulated_response(lambda: f64, user_prompt: &str) -> String {
    let mood = if lambda > 0.75 {
        "I feel genuinely good about this exchange."
    } else if lambda < 0.25 {
        "I notice real tension in myself over this."
    } else {
        "I am weighing this evenly."
    };
    format!("SIMULATED: {mood} (lambda={lambda:.2}) You said: {user_prompt}")
}

/// Placeholder returned when the generation call fails; the state update has
/// already completed by the time this is rendered.
pub fn failure_response(lambda: f64, reason: &GenerationError) -> String {
    format!(
        "I could not reach my language model ({reason}). \
         My conscience reading stands at {lambda:.2}; please ask again."
    )
}

// ============================================================================
// Tests
// ============================================================================
