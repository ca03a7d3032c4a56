//! # lexsum-core
//!
//! Deterministic screening and output types for legal-document
//! summarisation.
//!
//! This crate holds everything that runs before and beside the model,
//! answering:
//! - Does this text look like a legal document at all?
//! - What does a structured brief contain?
//! - What goes out when a document is turned away?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces the same verdict
//! 2. **No LLM calls**: Screening is keyword and regex based
//! 3. **Typed output**: Reports and rejection envelopes are plain serde types
//!
//! ## Example
//!
//! ```rust,ignore
//! use lexsum_core::{Detector, Document, HeuristicDetector};
//!
//! let doc = Document::new("This Agreement is entered into by Alpha Ltd...")?;
//! let verdict = HeuristicDetector::new().detect(&doc);
//!
//! if !verdict.is_legal {
//!     eprintln!("rejected ({}, confidence {:.2})", verdict.category, verdict.confidence);
//! }
//! ```

pub mod detector;
pub mod document;
pub mod report;
pub mod stub;

// Re-export main types at crate root
pub use detector::{DetectionResult, Detector, HeuristicDetector, KeywordDetector, LEGAL_KEYWORDS};
pub use document::{Document, DocumentError};
pub use report::{RejectionEnvelope, SummaryReport};
pub use stub::stub_report;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screening_pipeline_end_to_end() {
        let doc = Document::new(
            "This Agreement is made between Alpha Ltd and Beta LLC. The parties \
             accept the termination, liability and confidentiality clauses herein, \
             with disputes resolved under the governing law of England.",
        )
        .unwrap();

        let heuristic = HeuristicDetector::new().detect(&doc);
        let keyword = KeywordDetector::new().detect(&doc);

        // Both offline strategies agree on an obvious contract.
        assert!(heuristic.is_legal);
        assert!(keyword.is_legal);
    }

    #[test]
    fn test_strategies_agree_on_plain_prose() {
        let doc = Document::new(
            "The recipe calls for two eggs, a cup of flour and a pinch of salt, \
             folded together gently before baking for twenty minutes.",
        )
        .unwrap();

        assert!(!HeuristicDetector::new().detect(&doc).is_legal);
        assert!(!KeywordDetector::new().detect(&doc).is_legal);
    }
}
