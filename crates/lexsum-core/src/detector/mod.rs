//! Legal-likelihood screening.
//!
//! Question answered: does this text look like a legal document at all?
//!
//! Two offline strategies live here. [`HeuristicDetector`] scores weighted
//! signals and is the default; [`KeywordDetector`] is the older counting rule
//! kept for compatibility. Both are deterministic and never touch the
//! network. The model-delegated strategy lives in the runtime crate because
//! it needs a provider.

mod heuristic;
mod keywords;

pub use heuristic::HeuristicDetector;
pub use keywords::{KeywordDetector, LEGAL_KEYWORDS};

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Verdict from a screening strategy.
///
/// Model replies use the key `type` for the category; the alias keeps both
/// spellings parseable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionResult {
    /// Whether the text looks like a legal document
    pub is_legal: bool,
    /// Coarse document category, e.g. "contract"
    #[serde(alias = "type")]
    pub category: String,
    /// Confidence in [0.0, 1.0]
    pub confidence: f64,
    /// Which strategy produced the verdict, or the model's one-line rationale
    pub reason: String,
}

/// An offline screening strategy.
pub trait Detector {
    /// Strategy name recorded in the verdict.
    fn name(&self) -> &'static str;

    /// Screen a document. Infallible: every strategy always reaches a verdict.
    fn detect(&self, doc: &Document) -> DetectionResult;
}
