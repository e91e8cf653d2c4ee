//! Error types for the Notion client.

use thiserror::Error;

/// Result type for Notion client operations.
pub type Result<T> = std::result::Result<T, NotionError>;

/// Notion client errors.
#[derive(Debug, Error)]
pub enum NotionError {
    /// Configuration error (missing integration key, invalid base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API error (non-2xx response)
    #[error("Notion API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl NotionError {
    /// Whether a later retry of the same call could plausibly succeed.
    ///
    /// Network failures, rate limiting and 5xx responses are transient;
    /// everything else reflects a request the API will keep rejecting.
    pub fn is_transient(&self) -> bool {
        match self {
            NotionError::Network(_) => true,
            NotionError::Api { status, .. } => *status == 429 || *status >= 500,
            NotionError::Config(_) | NotionError::Parse(_) => false,
        }
    }
}
