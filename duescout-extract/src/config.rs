//! Extraction configuration with sensible defaults.
//!
//! [`ExtractConfig`] controls the candidate length window, the title
//! fallback, and the site-specific extensions to the keyword vocabulary and
//! the noise rule set. The defaults are tuned for course and LMS pages.

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// Shortest candidate text (in characters) that is considered.
pub const DEFAULT_MIN_CHARS: usize = 8;

/// Longest candidate text (in characters) that is considered.
pub const DEFAULT_MAX_CHARS: usize = 1000;

/// Title used when a page offers no heading and no `<title>`.
pub const DEFAULT_FALLBACK_TITLE: &str = "Untitled Assignment";

/// Configuration for a scrape pass.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Candidates with fewer trimmed characters than this are skipped.
    pub min_chars: usize,
    /// Candidates with more trimmed characters than this are skipped.
    pub max_chars: usize,
    /// Title used when every other title source is empty.
    pub fallback_title: String,
    /// Additional deadline phrases accepted by the keyword gate.
    pub extra_keywords: Vec<String>,
    /// Additional regular expressions; a line matching any of them is
    /// treated as boilerplate and removed from the task description.
    pub extra_noise_patterns: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_CHARS,
            max_chars: DEFAULT_MAX_CHARS,
            fallback_title: DEFAULT_FALLBACK_TITLE.to_owned(),
            extra_keywords: Vec::new(),
            extra_noise_patterns: Vec::new(),
        }
    }
}

impl ExtractConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `min_chars` must be greater than 0
    /// - `min_chars` must be <= `max_chars`
    /// - `fallback_title` must not be blank
    /// - every entry of `extra_keywords` must be non-blank
    /// - every entry of `extra_noise_patterns` must compile as a regex
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.min_chars == 0 {
            return Err(ExtractError::Config(
                "min_chars must be greater than 0".into(),
            ));
        }
        if self.min_chars > self.max_chars {
            return Err(ExtractError::Config(
                "min_chars must be <= max_chars".into(),
            ));
        }
        if self.fallback_title.trim().is_empty() {
            return Err(ExtractError::Config(
                "fallback_title must not be empty".into(),
            ));
        }
        if self.extra_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ExtractError::Config(
                "extra_keywords must not contain blank entries".into(),
            ));
        }
        for pattern in &self.extra_noise_patterns {
            regex::Regex::new(pattern)
                .map_err(|e| ExtractError::Pattern(format!("{pattern}: {e}")))?;
        }
        Ok(())
    }

    /// Whether a trimmed candidate of `len` characters is inside the window.
    pub fn accepts_len(&self, len: usize) -> bool {
        len >= self.min_chars && len <= self.max_chars
    }
}
