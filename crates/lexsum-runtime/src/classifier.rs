//! Model-delegated legal screening.
//!
//! Sends the constrained classification prompt and decodes the reply into
//! the same [`DetectionResult`] the offline detectors produce. Unlike
//! summarisation there is no degraded mode here: a reply that stays
//! malformed after the relaxed retry is fatal, because the caller needs a
//! verdict and must not guess one.

use std::sync::Arc;

use lexsum_core::{DetectionResult, Document};

use crate::invoker::{ModelInvoker, ModelOutput};
use crate::orchestrator::RuntimeError;
use crate::prompts;
use crate::providers::{CompletionConfig, LlmProvider};

/// Decoding temperature for screening. Verdicts should not be creative.
const CLASSIFY_TEMPERATURE: f32 = 0.0;
/// Token budget for the small classification reply.
const CLASSIFY_MAX_TOKENS: u32 = 300;

/// Screens documents by asking the model.
pub struct ModelClassifier {
    invoker: ModelInvoker,
}

impl ModelClassifier {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            invoker: ModelInvoker::new(provider),
        }
    }

    /// Ask the model whether the document is legal.
    pub async fn classify(
        &self,
        doc: &Document,
        model: &str,
    ) -> Result<DetectionResult, RuntimeError> {
        let config = CompletionConfig {
            model: model.to_string(),
            max_tokens: CLASSIFY_MAX_TOKENS,
            temperature: CLASSIFY_TEMPERATURE,
            json_mode: true,
        };

        let output = self
            .invoker
            .complete_json(prompts::classification_messages(doc), &config)
            .await?;

        match output {
            ModelOutput::Structured(value) => {
                let mut verdict: DetectionResult = serde_json::from_value(value)
                    .map_err(|e| RuntimeError::MalformedVerdict(e.to_string()))?;
                verdict.confidence = verdict.confidence.clamp(0.0, 1.0);
                tracing::debug!(
                    is_legal = verdict.is_legal,
                    category = %verdict.category,
                    confidence = verdict.confidence,
                    "model screening complete"
                );
                Ok(verdict)
            }
            ModelOutput::Unstructured(raw) => Err(RuntimeError::MalformedVerdict(preview(&raw))),
        }
    }
}

/// First line of a reply, clipped, for error messages.
fn preview(raw: &str) -> String {
    const MAX_CHARS: usize = 120;
    let first_line = raw.trim().lines().next().unwrap_or_default();
    let clipped: String = first_line.chars().take(MAX_CHARS).collect();
    if clipped.len() < first_line.len() {
        format!("{clipped}...")
    } else {
        clipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;
    use crate::testing::ScriptedProvider;

    fn fixture_doc() -> Document {
        Document::new("Minutes of the garden club meeting, June edition.").unwrap()
    }

    #[tokio::test]
    async fn test_verdict_parsed_from_model_reply() {
        let provider = Arc::new(ScriptedProvider::replies(vec![
            r#"{"is_legal": false, "type": "meeting notes", "confidence": 0.95, "reason": "no legal language"}"#,
        ]));
        let verdict = ModelClassifier::new(provider.clone())
            .classify(&fixture_doc(), "gpt-4o-mini")
            .await
            .unwrap();

        assert!(!verdict.is_legal);
        assert_eq!(verdict.category, "meeting notes");
        assert_eq!(verdict.reason, "no legal language");
        assert_eq!(provider.calls(), 1);
        // Screening runs cold and small.
        let config = provider.config_of_call(0);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_tokens, 300);
    }

    #[tokio::test]
    async fn test_out_of_range_confidence_is_clamped() {
        let provider = Arc::new(ScriptedProvider::replies(vec![
            r#"{"is_legal": true, "type": "contract", "confidence": 1.7, "reason": "clearly a contract"}"#,
        ]));
        let verdict = ModelClassifier::new(provider)
            .classify(&fixture_doc(), "gpt-4o-mini")
            .await
            .unwrap();

        assert_eq!(verdict.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_malformed_reply_after_retry_is_fatal() {
        let provider = Arc::new(ScriptedProvider::replies(vec![
            "I think this is probably legal.",
            "Still prose, sorry.",
        ]));
        let result = ModelClassifier::new(provider.clone())
            .classify(&fixture_doc(), "gpt-4o-mini")
            .await;

        assert!(matches!(result, Err(RuntimeError::MalformedVerdict(_))));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_wrong_shape_json_is_fatal() {
        // Valid JSON, wrong keys. The JSON-level retry already happened, so
        // this fails without further calls.
        let provider = Arc::new(ScriptedProvider::replies(vec![r#"{"verdict": "legal"}"#]));
        let result = ModelClassifier::new(provider.clone())
            .classify(&fixture_doc(), "gpt-4o-mini")
            .await;

        assert!(matches!(result, Err(RuntimeError::MalformedVerdict(_))));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ProviderError::HttpError("dns failure".to_string())),
            Err(ProviderError::HttpError("dns failure".to_string())),
        ]));
        let result = ModelClassifier::new(provider)
            .classify(&fixture_doc(), "gpt-4o-mini")
            .await;

        assert!(matches!(result, Err(RuntimeError::Provider(_))));
    }
}
