//! Output shapes for a summarisation run.
//!
//! [`SummaryReport`] is the structured brief with its ten fixed keys.
//! [`RejectionEnvelope`] is what goes out when screening turns a document
//! away. Field values are free text; nothing beyond JSON validity is
//! enforced on model output.

use serde::{Deserialize, Serialize};

use crate::detector::DetectionResult;

/// Structured brief over one legal document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Document title or a short synthesised one
    pub title: String,
    /// Named parties to the instrument
    pub parties: Vec<String>,
    /// What the document is for, in a sentence or two
    pub purpose: String,
    /// Defined terms and headline commercial points
    pub key_terms: Vec<String>,
    /// Duties each party takes on
    pub obligations: Vec<String>,
    /// Liability, disclaimers and exposure worth flagging
    pub risks: Vec<String>,
    /// Dates, deadlines and notice periods
    pub dates_deadlines: Vec<String>,
    /// How the document ends or can be ended
    pub termination: String,
    /// Governing law and forum
    pub governing_law: String,
    /// Clauses a careful reader should look at twice
    pub red_flags: Vec<String>,
}

/// Payload emitted when a document is turned away as non-legal.
#[derive(Debug, Clone, Serialize)]
pub struct RejectionEnvelope {
    /// Fixed machine-readable marker
    pub error: &'static str,
    /// The verdict that caused the rejection
    pub detector: DetectionResult,
}

impl RejectionEnvelope {
    pub fn new(detector: DetectionResult) -> Self {
        Self {
            error: "not_legal",
            detector,
        }
    }
}
