//! Offline stub output.
//!
//! A fixed placeholder report for runs without network access. Every field
//! is marked as stub content and nothing is derived from the input, so the
//! output is byte-identical across runs.

use crate::report::SummaryReport;

/// Build the fixed offline report.
pub fn stub_report() -> SummaryReport {
    SummaryReport {
        title: "[stub] Offline summary".to_string(),
        parties: vec!["[stub] parties not extracted".to_string()],
        purpose: "[stub] Generated without network access; the document was not analysed."
            .to_string(),
        key_terms: vec!["[stub] key terms not extracted".to_string()],
        obligations: vec!["[stub] obligations not extracted".to_string()],
        risks: vec!["[stub] risks not assessed".to_string()],
        dates_deadlines: vec!["[stub] dates and deadlines not extracted".to_string()],
        termination: "[stub] termination clauses not reviewed".to_string(),
        governing_law: "[stub] governing law not identified".to_string(),
        red_flags: vec![
            "[stub] offline mode performed no analysis; real risks in the document are not listed here"
                .to_string(),
        ],
    }
}
