//! Summarisation pipeline.
//!
//! One configurable pipeline replaces the two historical entry points.
//! It implements:
//! - Screening through the configured detector
//! - Rejection of non-legal input before any summarisation request
//! - Structured and legacy output shapes over the same provider
//! - A fully offline path that emits the stub report

use std::sync::Arc;
use thiserror::Error;

use serde_json::Value as JsonValue;

use lexsum_core::{
    stub_report, DetectionResult, Detector, Document, HeuristicDetector, KeywordDetector,
};

use crate::classifier::ModelClassifier;
use crate::invoker::{ModelInvoker, ModelOutput};
use crate::prompts;
use crate::providers::{CompletionConfig, LlmProvider, OpenAiProvider, ProviderError, DEFAULT_MODEL};

/// Decoding temperature for the structured brief.
const STRUCTURED_TEMPERATURE: f32 = 0.2;
/// Decoding temperature for the legacy free-text brief.
const LEGACY_TEMPERATURE: f32 = 0.3;

/// Errors from the summarisation pipeline.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("screening reply was not a usable verdict: {0}")]
    MalformedVerdict(String),

    #[error("model-delegated detection is not available offline")]
    DetectorNeedsNetwork,

    #[error("no provider configured for an online run")]
    ProviderNotConfigured,

    #[error("JSON serialisation failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output shape for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputShape {
    /// Ten-key JSON report
    #[default]
    Structured,
    /// Free-text brief with a leading disclaimer
    Legacy,
}

/// Screening strategy for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectorKind {
    /// Weighted offline scorer
    #[default]
    Heuristic,
    /// Older keyword counter
    Keyword,
    /// Ask the model; needs network access
    Model,
}

/// Options for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Output shape
    pub shape: OutputShape,

    /// Screening strategy
    pub detector: DetectorKind,

    /// Skip the network entirely and emit the stub report
    pub offline: bool,

    /// Summarise even when screening says the text is not legal
    pub force: bool,

    /// Model name passed through to the provider
    pub model: String,

    /// Token budget for the summary reply
    pub max_tokens: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            shape: OutputShape::default(),
            detector: DetectorKind::default(),
            offline: false,
            force: false,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1200,
        }
    }
}

/// Result of a pipeline run.
#[derive(Debug)]
pub enum Outcome {
    /// Structured JSON summary
    Structured(JsonValue),
    /// Free text: the legacy brief, or a reply that failed JSON recovery
    Unstructured(String),
    /// Document turned away as non-legal
    Rejected(DetectionResult),
}

/// The summarisation pipeline.
///
/// # Execution Flow
/// 1. Screen the document with the configured detector
/// 2. Turn non-legal input away before any summarisation request
/// 3. Offline runs emit the stub report; online runs go to the model
/// 4. Structured output goes through JSON recovery; legacy output does not
pub struct Pipeline {
    /// Provider for online runs; absent when offline
    provider: Option<Arc<dyn LlmProvider>>,

    /// Options for this run
    options: PipelineOptions,
}

impl Pipeline {
    /// Build a pipeline from the environment.
    ///
    /// Online runs construct the OpenAI-compatible provider from
    /// `OPENAI_API_KEY` and `OPENAI_BASE_URL`; offline runs skip provider
    /// construction entirely, so no credentials are required.
    pub fn from_env(options: PipelineOptions) -> Result<Self, RuntimeError> {
        let provider = if options.offline {
            None
        } else {
            Some(Arc::new(OpenAiProvider::from_env()?) as Arc<dyn LlmProvider>)
        };
        Self::with_provider(provider, options)
    }

    /// Build a pipeline around an explicit provider. Used by tests and by
    /// embedders with their own transport.
    pub fn with_provider(
        provider: Option<Arc<dyn LlmProvider>>,
        options: PipelineOptions,
    ) -> Result<Self, RuntimeError> {
        if options.offline && options.detector == DetectorKind::Model {
            return Err(RuntimeError::DetectorNeedsNetwork);
        }
        Ok(Self { provider, options })
    }

    /// Run the full pipeline on one document.
    pub async fn run(&self, doc: &Document) -> Result<Outcome, RuntimeError> {
        let verdict = self.screen(doc).await?;
        tracing::info!(
            is_legal = verdict.is_legal,
            category = %verdict.category,
            confidence = verdict.confidence,
            reason = %verdict.reason,
            "screening complete"
        );

        if !verdict.is_legal && !self.options.force {
            tracing::info!("document turned away as non-legal");
            return Ok(Outcome::Rejected(verdict));
        }

        self.summarise(doc).await
    }

    async fn screen(&self, doc: &Document) -> Result<DetectionResult, RuntimeError> {
        match self.options.detector {
            DetectorKind::Heuristic => Ok(HeuristicDetector::new().detect(doc)),
            DetectorKind::Keyword => Ok(KeywordDetector::new().detect(doc)),
            DetectorKind::Model => {
                let classifier = ModelClassifier::new(self.provider()?);
                classifier.classify(doc, &self.options.model).await
            }
        }
    }

    async fn summarise(&self, doc: &Document) -> Result<Outcome, RuntimeError> {
        if self.options.offline {
            if self.options.shape == OutputShape::Legacy {
                tracing::warn!("the legacy brief has no offline path; emitting the structured stub");
            }
            return Ok(Outcome::Structured(serde_json::to_value(stub_report())?));
        }

        let invoker = ModelInvoker::new(self.provider()?);

        match self.options.shape {
            OutputShape::Structured => {
                let config = CompletionConfig {
                    model: self.options.model.clone(),
                    max_tokens: self.options.max_tokens,
                    temperature: STRUCTURED_TEMPERATURE,
                    json_mode: true,
                };
                let output = invoker
                    .complete_json(prompts::summary_messages(doc), &config)
                    .await?;
                Ok(match output {
                    ModelOutput::Structured(value) => Outcome::Structured(value),
                    ModelOutput::Unstructured(raw) => Outcome::Unstructured(raw),
                })
            }
            OutputShape::Legacy => {
                let config = CompletionConfig {
                    model: self.options.model.clone(),
                    max_tokens: self.options.max_tokens,
                    temperature: LEGACY_TEMPERATURE,
                    json_mode: false,
                };
                let brief = invoker
                    .complete_text(prompts::legacy_messages(doc), &config)
                    .await?;
                Ok(Outcome::Unstructured(brief))
            }
        }
    }

    fn provider(&self) -> Result<Arc<dyn LlmProvider>, RuntimeError> {
        self.provider
            .clone()
            .ok_or(RuntimeError::ProviderNotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedProvider;

    fn contract_doc() -> Document {
        Document::new(
            "This Agreement is entered into between Alpha Ltd and Beta LLC. The \
             parties accept the termination and liability clauses herein.",
        )
        .unwrap()
    }

    fn prose_doc() -> Document {
        Document::new("We walked to the park and fed the ducks for an hour.").unwrap()
    }

    fn pipeline(provider: &Arc<ScriptedProvider>, options: PipelineOptions) -> Pipeline {
        Pipeline::with_provider(Some(provider.clone() as Arc<dyn LlmProvider>), options).unwrap()
    }

    #[tokio::test]
    async fn test_rejection_never_reaches_the_provider() {
        let provider = Arc::new(ScriptedProvider::replies(vec![]));
        let outcome = pipeline(&provider, PipelineOptions::default())
            .run(&prose_doc())
            .await
            .unwrap();

        match outcome {
            Outcome::Rejected(verdict) => {
                assert!(!verdict.is_legal);
                assert_eq!(verdict.reason, "heuristic");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_force_summarises_rejected_input() {
        let provider = Arc::new(ScriptedProvider::replies(vec![r#"{"title": "Walk log"}"#]));
        let options = PipelineOptions {
            force: true,
            ..PipelineOptions::default()
        };
        let outcome = pipeline(&provider, options).run(&prose_doc()).await.unwrap();

        assert!(matches!(outcome, Outcome::Structured(_)));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_structured_run_uses_summary_temperature() {
        let provider = Arc::new(ScriptedProvider::replies(vec![r#"{"title": "MSA"}"#]));
        let outcome = pipeline(&provider, PipelineOptions::default())
            .run(&contract_doc())
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Structured(_)));
        let config = provider.config_of_call(0);
        assert_eq!(config.temperature, 0.2);
        assert!(config.json_mode);
    }

    #[tokio::test]
    async fn test_degraded_output_is_not_an_error() {
        let provider = Arc::new(ScriptedProvider::replies(vec![
            "The document says many things.",
            "It really does.",
        ]));
        let outcome = pipeline(&provider, PipelineOptions::default())
            .run(&contract_doc())
            .await
            .unwrap();

        match outcome {
            Outcome::Unstructured(raw) => assert_eq!(raw, "It really does."),
            other => panic!("expected degraded text, got {other:?}"),
        }
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_legacy_run_is_single_shot_prose() {
        let provider = Arc::new(ScriptedProvider::replies(vec![
            "This is an AI-generated summary and not legal advice. ...",
        ]));
        let options = PipelineOptions {
            shape: OutputShape::Legacy,
            ..PipelineOptions::default()
        };
        let outcome = pipeline(&provider, options).run(&contract_doc()).await.unwrap();

        assert!(matches!(outcome, Outcome::Unstructured(_)));
        // Prose output never triggers JSON recovery.
        assert_eq!(provider.calls(), 1);
        let config = provider.config_of_call(0);
        assert_eq!(config.temperature, 0.3);
        assert!(!config.json_mode);
    }

    #[tokio::test]
    async fn test_offline_run_emits_stub_without_provider() {
        let options = PipelineOptions {
            offline: true,
            ..PipelineOptions::default()
        };
        let outcome = Pipeline::with_provider(None, options)
            .unwrap()
            .run(&contract_doc())
            .await
            .unwrap();

        match outcome {
            Outcome::Structured(value) => {
                assert!(value["title"].as_str().unwrap().contains("[stub]"));
                assert!(value.get("red_flags").is_some());
            }
            other => panic!("expected stub report, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_offline_legacy_degrades_to_structured_stub() {
        let options = PipelineOptions {
            offline: true,
            shape: OutputShape::Legacy,
            ..PipelineOptions::default()
        };
        let outcome = Pipeline::with_provider(None, options)
            .unwrap()
            .run(&contract_doc())
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Structured(_)));
    }

    #[tokio::test]
    async fn test_offline_still_rejects_non_legal_input() {
        let options = PipelineOptions {
            offline: true,
            ..PipelineOptions::default()
        };
        let outcome = Pipeline::with_provider(None, options)
            .unwrap()
            .run(&prose_doc())
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Rejected(_)));
    }

    #[tokio::test]
    async fn test_model_detector_verdict_routes_rejection() {
        let provider = Arc::new(ScriptedProvider::replies(vec![
            r#"{"is_legal": false, "type": "diary", "confidence": 0.9, "reason": "personal writing"}"#,
        ]));
        let options = PipelineOptions {
            detector: DetectorKind::Model,
            ..PipelineOptions::default()
        };
        let outcome = pipeline(&provider, options).run(&contract_doc()).await.unwrap();

        match outcome {
            Outcome::Rejected(verdict) => assert_eq!(verdict.category, "diary"),
            other => panic!("expected rejection, got {other:?}"),
        }
        // One screening call, no summarisation call.
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_model_detector_acceptance_proceeds_to_summary() {
        let provider = Arc::new(ScriptedProvider::replies(vec![
            r#"{"is_legal": true, "type": "contract", "confidence": 0.97, "reason": "contract language"}"#,
            r#"{"title": "MSA"}"#,
        ]));
        let options = PipelineOptions {
            detector: DetectorKind::Model,
            ..PipelineOptions::default()
        };
        let outcome = pipeline(&provider, options).run(&contract_doc()).await.unwrap();

        assert!(matches!(outcome, Outcome::Structured(_)));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_keyword_detector_is_selectable() {
        let provider = Arc::new(ScriptedProvider::replies(vec![r#"{"title": "MSA"}"#]));
        let options = PipelineOptions {
            detector: DetectorKind::Keyword,
            ..PipelineOptions::default()
        };
        let outcome = pipeline(&provider, options).run(&contract_doc()).await.unwrap();

        assert!(matches!(outcome, Outcome::Structured(_)));
    }

    #[test]
    fn test_offline_model_detector_is_refused_up_front() {
        let options = PipelineOptions {
            offline: true,
            detector: DetectorKind::Model,
            ..PipelineOptions::default()
        };
        let result = Pipeline::with_provider(None, options);
        assert!(matches!(result, Err(RuntimeError::DetectorNeedsNetwork)));
    }

    #[tokio::test]
    async fn test_provider_error_surfaces_as_runtime_error() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ProviderError::ApiError {
                status: 500,
                message: "server exploded".to_string(),
            }),
            Err(ProviderError::ApiError {
                status: 500,
                message: "server exploded".to_string(),
            }),
        ]));
        let result = pipeline(&provider, PipelineOptions::default())
            .run(&contract_doc())
            .await;

        match result {
            Err(RuntimeError::Provider(e)) => assert!(e.to_string().contains("500")),
            other => panic!("expected provider error, got {other:?}"),
        }
    }
}
