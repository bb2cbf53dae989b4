//! Keyword gate: does a block of text talk about a deadline at all?
//!
//! The gate runs before any date parsing so that unrelated numeric text
//! (prices, page numbers, scores) never reaches the parser.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{ExtractError, Result};

static DEFAULT_VOCABULARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:overdue|due|deadlines?|open\s+until|available\s+until|clos(?:es|ing)|submit\s+by|turn\s+in\s+by)\b",
    )
    .expect("deadline vocabulary regex must be valid")
});

/// Returns `true` when `text` contains a deadline phrase from the built-in
/// vocabulary ("due", "overdue", "deadline", "open until", "available
/// until", "closes"/"closing", "submit by", "turn in by").
///
/// Matching is case-insensitive and respects word boundaries, so
/// "residue" does not count as "due".
pub fn is_due_candidate(text: &str) -> bool {
    DEFAULT_VOCABULARY.is_match(text)
}

/// Keyword gate with an optional site-specific vocabulary extension.
#[derive(Debug, Clone, Default)]
pub struct KeywordGate {
    extra: Option<Regex>,
}

impl KeywordGate {
    /// Gate using only the built-in vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate that additionally accepts each of `phrases` (literal text,
    /// case-insensitive, whitespace-tolerant).
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Pattern`] if the combined phrase list cannot
    /// be compiled.
    pub fn with_extra_phrases(phrases: &[String]) -> Result<Self> {
        let alternatives: Vec<String> = phrases
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect();

        if alternatives.is_empty() {
            return Ok(Self::new());
        }

        let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
        let extra = Regex::new(&pattern).map_err(|e| ExtractError::Pattern(e.to_string()))?;
        Ok(Self { extra: Some(extra) })
    }

    /// Whether `text` plausibly describes a due/deadline event.
    pub fn is_due_candidate(&self, text: &str) -> bool {
        is_due_candidate(text) || self.extra.as_ref().is_some_and(|re| re.is_match(text))
    }
}
