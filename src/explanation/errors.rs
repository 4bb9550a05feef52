//! Failures of the explanation service. None of them reaches the client: the enricher
//! turns each into placeholder text.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplanationError {
    /// connection failure, timeout or unreadable body
    #[error("request to explanation service failed: {0}")]
    Transport(String),

    #[error("explanation service answered with status {0}")]
    Status(u16),

    /// reply without candidate text or with text that is not the expected JSON
    #[error("malformed reply from explanation service: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ExplanationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ExplanationError::Transport(format!("timed out: {e}"))
        } else if e.is_connect() {
            ExplanationError::Transport(format!("connection error: {e}"))
        } else {
            ExplanationError::Transport(e.to_string())
        }
    }
}
