//! Model invocation with JSON recovery.
//!
//! The first attempt asks the server to constrain output to a JSON object.
//! On any failure, whether the server rejects the constraint, the transport
//! fails, or the reply is malformed, exactly one relaxed retry goes out with
//! a strict-JSON directive appended to the prompt. A reply that still will
//! not parse degrades to raw text rather than erroring: a readable summary
//! beats no summary.

use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::prompts;
use crate::providers::{
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError,
};

/// Outcome of a JSON-requesting completion.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    /// The reply parsed as JSON
    Structured(JsonValue),
    /// Raw reply text, kept after JSON recovery failed on both attempts
    Unstructured(String),
}

/// Issues completions with the two-step JSON procedure.
pub struct ModelInvoker {
    provider: Arc<dyn LlmProvider>,
}

impl ModelInvoker {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Request a completion that should come back as JSON.
    ///
    /// Transport failure on the retry is fatal; a reply that merely will not
    /// parse degrades to [`ModelOutput::Unstructured`].
    pub async fn complete_json(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<ModelOutput, ProviderError> {
        let strict = CompletionConfig {
            json_mode: true,
            ..config.clone()
        };

        match self.provider.complete(messages.clone(), &strict).await {
            Ok(response) => {
                self.log_usage(&response);
                if let Some(value) = extract_json(&response.content) {
                    return Ok(ModelOutput::Structured(value));
                }
                tracing::warn!(
                    provider = self.provider.name(),
                    "constrained reply was not valid JSON, retrying relaxed"
                );
            }
            Err(e) => {
                // Older or self-hosted servers reject response_format outright.
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "constrained request failed, retrying relaxed"
                );
            }
        }

        let relaxed = CompletionConfig {
            json_mode: false,
            ..config.clone()
        };
        let response = self
            .provider
            .complete(prompts::with_json_retry_directive(messages), &relaxed)
            .await?;
        self.log_usage(&response);

        match extract_json(&response.content) {
            Some(value) => Ok(ModelOutput::Structured(value)),
            None => {
                tracing::warn!(
                    provider = self.provider.name(),
                    "JSON recovery failed after retry, degrading to raw text"
                );
                Ok(ModelOutput::Unstructured(response.content))
            }
        }
    }

    /// Plain completion with no JSON handling. Used for the legacy brief.
    pub async fn complete_text(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<String, ProviderError> {
        let response = self.provider.complete(messages, config).await?;
        self.log_usage(&response);
        Ok(response.content.trim().to_string())
    }

    fn log_usage(&self, response: &CompletionResponse) {
        tracing::debug!(
            provider = self.provider.name(),
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "completion finished"
        );
        if response.stop_reason.as_deref() == Some("length") {
            tracing::warn!("reply was cut off by the token budget; consider raising --max-tokens");
        }
    }
}

/// Best-effort JSON extraction from a model reply.
///
/// Accepts clean JSON, fenced JSON, and an object embedded in prose, in that
/// order of preference.
pub fn extract_json(content: &str) -> Option<JsonValue> {
    let trimmed = content.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    let unfenced = strip_code_fences(trimmed);
    if let Ok(value) = serde_json::from_str(unfenced) {
        return Some(value);
    }

    // Last resort: the outermost {...} span inside surrounding prose.
    let start = unfenced.find('{')?;
    let end = unfenced.rfind('}')?;
    if end > start {
        serde_json::from_str(&unfenced[start..=end]).ok()
    } else {
        None
    }
}

/// Strip a surrounding Markdown code fence, with or without a language tag.
fn strip_code_fences(text: &str) -> &str {
    let mut inner = text.trim();
    if let Some(rest) = inner.strip_prefix("```") {
        inner = match rest.split_once('\n') {
            Some((_, body)) => body,
            None => rest,
        };
        if let Some(body) = inner.strip_suffix("```") {
            inner = body;
        }
    }
    inner.trim()
}
