//! Error types for the duescout host.

use duescout_extract::ExtractError;

/// Top-level error type for scanning pages and submitting tasks.
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The extraction engine rejected its configuration.
    #[error("extract error: {0}")]
    Extract(#[from] ExtractError),

    /// Transport-level HTTP failure (connect, timeout, body).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The task tracker answered with a non-success status.
    #[error("submit error: {0}")]
    Submit(String),
}

impl From<reqwest::Error> for ScoutError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            ScoutError::Config("missing endpoint".into()).to_string(),
            "config error: missing endpoint"
        );
        assert_eq!(
            ScoutError::Submit("HTTP 500".into()).to_string(),
            "submit error: HTTP 500"
        );
        assert_eq!(
            ScoutError::Http("timed out".into()).to_string(),
            "HTTP error: timed out"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ScoutError = io.into();
        assert!(matches!(err, ScoutError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn extract_error_converts() {
        let err: ScoutError = ExtractError::Config("min_chars must be greater than 0".into()).into();
        assert_eq!(
            err.to_string(),
            "extract error: config error: min_chars must be greater than 0"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScoutError>();
    }
}
