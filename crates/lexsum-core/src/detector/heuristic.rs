//! Weighted-signal detector. Default screening strategy.
//!
//! The score starts at zero and accumulates three weighted signals: legal
//! vocabulary, document length, and company-suffix tokens. Anything at or
//! above the threshold is treated as legal.

use lazy_static::lazy_static;
use regex::Regex;

use super::{DetectionResult, Detector};
use crate::document::Document;

/// Weight for the presence of at least one legal-signal term.
const SIGNAL_WEIGHT: f64 = 0.6;
/// Weight for documents long enough to be a real instrument.
const LENGTH_WEIGHT: f64 = 0.2;
/// Weight for a company-suffix token such as "Ltd" or "LLC".
const COMPANY_WEIGHT: f64 = 0.2;
/// Scores at or above this are treated as legal.
const LEGAL_THRESHOLD: f64 = 0.6;
/// Word count that counts as a long document.
const LONG_DOCUMENT_WORDS: usize = 120;

lazy_static! {
    /// Terms that strongly suggest a legal instrument. Matched
    /// case-insensitively as substrings, so "indemnif" covers "indemnify",
    /// "indemnified" and "indemnification".
    static ref SIGNAL_TERMS: Vec<&'static str> = vec![
        "agreement",
        "clause",
        "party",
        "parties",
        "effective date",
        "governing law",
        "termination",
        "warranty",
        "indemnif",
        "liability",
        "confidential",
        "hereby",
        "whereas",
    ];

    /// Clause references in the style of "Section 12".
    static ref SECTION_REFERENCE: Regex = Regex::new(r"(?i)\bsection\s+\d+").unwrap();

    /// Company suffixes. Case-sensitive: "inc" in running prose is noise,
    /// "Inc" as a token is a company name.
    static ref COMPANY_SUFFIX: Regex = Regex::new(r"\b(Ltd|LLC|PLC|Inc)\b").unwrap();
}

/// Screens text by scoring weighted legal signals.
#[derive(Debug, Default)]
pub struct HeuristicDetector;

impl HeuristicDetector {
    pub fn new() -> Self {
        Self
    }

    /// Weighted legal-likelihood score in [0.0, 1.0].
    pub fn score(&self, text: &str) -> f64 {
        let mut score = 0.0;

        if has_signal_term(text) {
            score += SIGNAL_WEIGHT;
        }
        if text.split_whitespace().count() > LONG_DOCUMENT_WORDS {
            score += LENGTH_WEIGHT;
        }
        if COMPANY_SUFFIX.is_match(text) {
            score += COMPANY_WEIGHT;
        }

        score.clamp(0.0, 1.0)
    }
}

fn has_signal_term(text: &str) -> bool {
    let lower = text.to_lowercase();
    SIGNAL_TERMS.iter().any(|term| lower.contains(term)) || SECTION_REFERENCE.is_match(text)
}

impl Detector for HeuristicDetector {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn detect(&self, doc: &Document) -> DetectionResult {
        let confidence = self.score(doc.text());
        let is_legal = confidence >= LEGAL_THRESHOLD;
        tracing::debug!(confidence, is_legal, "heuristic screening complete");

        DetectionResult {
            is_legal,
            category: if is_legal { "contract" } else { "other" }.to_string(),
            confidence,
            reason: self.name().to_string(),
        }
    }
}
