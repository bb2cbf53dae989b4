//! Error types for the duescout-extract crate.
//!
//! Scraping itself never fails: candidates that do not match are dropped.
//! Errors only arise while building an extractor from configuration.

/// Errors that can occur while configuring the extraction engine.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Invalid extraction configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A user-supplied noise or keyword pattern failed to compile.
    #[error("pattern error: {0}")]
    Pattern(String),
}

/// Convenience type alias for duescout-extract results.
pub type Result<T> = std::result::Result<T, ExtractError>;
