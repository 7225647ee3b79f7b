//! Custom error types for olasis.
//!
//! This module defines the error type shared by the search clients, the HTTP
//! server and the client library. The LLM gateway has its own error type in
//! [`crate::chat::gateway`] because its failures never leave the chat pipeline.

use thiserror::Error;

/// Main error type for olasis operations.
#[derive(Debug, Error)]
pub enum OlasisError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// External API (or the OLASIS server) answered with a non-OK status
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from API
        message: String,
    },

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Rejected user input
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias using `OlasisError`
pub type Result<T> = std::result::Result<T, OlasisError>;

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a parse error message
    fn ok_or_parse(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_parse(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| OlasisError::Parse(msg.to_string()))
    }
}
