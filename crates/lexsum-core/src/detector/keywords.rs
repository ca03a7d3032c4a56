//! Keyword-count detector. The older screening rule.
//!
//! Text is legal when it has at least 50 non-whitespace characters and at
//! least two distinct keywords from the fixed table. The native contract is
//! a plain boolean; [`Detector`] wraps it with an all-or-nothing confidence.

use lazy_static::lazy_static;

use super::{DetectionResult, Detector};
use crate::document::Document;

/// Distinct keyword matches required to call text legal.
const MIN_KEYWORD_MATCHES: usize = 2;
/// Non-whitespace characters required before the keyword rule applies.
const MIN_SUBSTANCE_CHARS: usize = 50;

lazy_static! {
    /// Fixed keyword table. Matched case-insensitively as substrings; each
    /// entry counts at most once however often it appears.
    pub static ref LEGAL_KEYWORDS: Vec<&'static str> = vec![
        "agreement",
        "contract",
        "party",
        "parties",
        "shall",
        "hereby",
        "warranty",
        "representations",
        "liability",
        "indemnify",
        "indemnification",
        "governing law",
        "jurisdiction",
        "venue",
        "arbitration",
        "mediation",
        "term",
        "termination",
        "confidentiality",
        "non-disclosure",
        "nda",
        "consideration",
        "assignment",
        "force majeure",
        "severability",
        "entire agreement",
        "amendment",
        "effective date",
        "dispute resolution",
        "penalty",
        "fees",
        "payment",
        "license",
        "licence",
        "obligation",
        "clause",
        "herein",
        "whereas",
    ];
}

/// Screens text by counting distinct legal keywords.
#[derive(Debug, Default)]
pub struct KeywordDetector;

impl KeywordDetector {
    pub fn new() -> Self {
        Self
    }

    /// Number of distinct table entries present in the text.
    pub fn keyword_matches(&self, text: &str) -> usize {
        let lower = text.to_lowercase();
        LEGAL_KEYWORDS.iter().filter(|kw| lower.contains(*kw)).count()
    }

    /// The boolean screening rule: enough substance, enough keywords.
    pub fn is_probably_legal(&self, text: &str) -> bool {
        let substance = text.chars().filter(|c| !c.is_whitespace()).count();
        if substance < MIN_SUBSTANCE_CHARS {
            return false;
        }
        self.keyword_matches(text) >= MIN_KEYWORD_MATCHES
    }
}

impl Detector for KeywordDetector {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn detect(&self, doc: &Document) -> DetectionResult {
        let is_legal = self.is_probably_legal(doc.text());
        tracing::debug!(is_legal, "keyword screening complete");

        DetectionResult {
            is_legal,
            category: if is_legal { "contract" } else { "other" }.to_string(),
            // The counting rule has no graded score, only a verdict.
            confidence: if is_legal { 1.0 } else { 0.0 },
            reason: self.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NDA_SNIPPET: &str = "This non-disclosure agreement binds both parties \
        to confidentiality obligations for the full term.";

    #[test]
    fn test_short_text_is_never_legal() {
        let detector = KeywordDetector::new();
        // Two keywords but fewer than 50 non-whitespace characters.
        assert!(!detector.is_probably_legal("agreement contract"));
    }

    #[test]
    fn test_one_keyword_is_not_enough() {
        let detector = KeywordDetector::new();
        let text = "A very long piece of ordinary writing that happens to use \
                    the word penalty once and nothing else remarkable at all.";
        assert!(!detector.is_probably_legal(text));
    }

    #[test]
    fn test_two_keywords_with_substance_are_legal() {
        let detector = KeywordDetector::new();
        assert!(detector.is_probably_legal(NDA_SNIPPET));
    }

    #[test]
    fn test_repeats_of_one_keyword_count_once() {
        let detector = KeywordDetector::new();
        let text = "clause clause clause clause clause clause clause clause \
                    clause clause clause clause";
        assert_eq!(detector.keyword_matches(text), 1);
        assert!(!detector.is_probably_legal(text));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let detector = KeywordDetector::new();
        assert_eq!(detector.keyword_matches("AGREEMENT and WARRANTY terms"), 3);
    }

    #[test]
    fn test_verdict_wraps_boolean_contract() {
        let doc = Document::new(NDA_SNIPPET).unwrap();
        let verdict = KeywordDetector::new().detect(&doc);
        assert!(verdict.is_legal);
        assert_eq!(verdict.confidence, 1.0);
        assert_eq!(verdict.category, "contract");
        assert_eq!(verdict.reason, "keyword");

        let doc =
            Document::new("The weather was pleasant for most of the afternoon and evening today.")
                .unwrap();
        let verdict = KeywordDetector::new().detect(&doc);
        assert!(!verdict.is_legal);
        assert_eq!(verdict.confidence, 0.0);
        assert_eq!(verdict.category, "other");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_short_text_is_never_legal(text in ".{0,20}") {
                // Up to 20 characters can never reach the substance floor.
                prop_assert!(!KeywordDetector::new().is_probably_legal(&text));
            }

            #[test]
            fn prop_matches_never_exceed_table_size(text in ".{0,300}") {
                let matches = KeywordDetector::new().keyword_matches(&text);
                prop_assert!(matches <= LEGAL_KEYWORDS.len());
            }
        }
    }
}
