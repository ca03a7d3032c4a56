//! Input document model.
//!
//! A [`Document`] owns the raw text for the duration of one run. Construction
//! rejects empty and whitespace-only input, so every later stage can assume
//! there is something to screen.

use thiserror::Error;

/// Errors from document construction.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Input is empty.")]
    Empty,
}

/// Raw input text for a single run. Never persisted.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
}

impl Document {
    /// Create a document from raw text.
    ///
    /// Returns [`DocumentError::Empty`] for empty or whitespace-only input.
    pub fn new(text: impl Into<String>) -> Result<Self, DocumentError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DocumentError::Empty);
        }
        Ok(Self { text })
    }

    /// The full document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whitespace-separated word count.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Number of non-whitespace characters.
    pub fn non_whitespace_len(&self) -> usize {
        self.text.chars().filter(|c| !c.is_whitespace()).count()
    }

    /// The first `max_chars` characters, cut on a character boundary.
    pub fn excerpt(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }
}
