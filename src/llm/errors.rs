//! Completion error taxonomy and retry classification.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid response format from API: {0}")]
    Format(String),

    #[error("All {attempts} attempts failed. Last error: {detail}")]
    Exhausted {
        attempts: u32,
        last_status: Option<u16>,
        detail: String,
    },

    #[error("Failed to create HTTP client: {0}")]
    Configuration(String),
}

impl CompletionError {
    /// Transport failures and non-2xx statuses consume a retry slot; a
    /// malformed success body does not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CompletionError::Network(_) | CompletionError::HttpStatus { .. }
        )
    }

    /// Last HTTP status observed, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            CompletionError::HttpStatus { status, .. } => Some(*status),
            CompletionError::Exhausted { last_status, .. } => *last_status,
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Short human description of a failing status, used in logs.
pub fn describe_status(status: u16) -> &'static str {
    match status {
        401 => "Authentication failed - check your API key",
        403 => "Access forbidden - insufficient permissions",
        429 => "Rate limit exceeded - too many requests",
        500..=599 => "Server error",
        _ => "HTTP error",
    }
}
