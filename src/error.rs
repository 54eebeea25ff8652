// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Process-level failures: configuration, startup and serving.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single search. Never fatal to the session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider returned status {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("Failed to parse provider response: {0}")]
    Parse(String),
}

impl SearchError {
    /// Stable tag used in JSON error bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::InvalidRequest(_) => "invalid_request",
            SearchError::Authentication(_) => "authentication",
            SearchError::Transport(_) => "transport",
            SearchError::Provider { .. } => "provider",
            SearchError::Parse(_) => "parse",
        }
    }

    /// Heading shown above the inline error banner.
    pub fn title(&self) -> &'static str {
        match self {
            SearchError::InvalidRequest(_) => "Please check your search",
            SearchError::Authentication(_) => "The API credential was rejected",
            SearchError::Transport(_) => "Could not reach the search service",
            SearchError::Provider { .. } => "The search service returned an error",
            SearchError::Parse(_) => "The search service sent an unexpected response",
        }
    }

    /// Whether submitting the same request again could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SearchError::Transport(_) | SearchError::Provider { .. }
        )
    }

    /// Message without the kind prefix, the provider text verbatim where there is one.
    pub fn detail(&self) -> &str {
        match self {
            SearchError::InvalidRequest(msg)
            | SearchError::Authentication(msg)
            | SearchError::Transport(msg)
            | SearchError::Parse(msg) => msg,
            SearchError::Provider { message, .. } => message,
        }
    }
}
