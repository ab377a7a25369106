//! Unified error handling
//!
//! One tagged error type for the whole system so callers can branch
//! exhaustively on the failure kind instead of inspecting messages.

use thiserror::Error;

pub type SearchResult<T> = Result<T, SearchError>;

/// Main error type for the SmartSearch system
#[derive(Error, Debug)]
pub enum SearchError {
    /// Pre-flight rejection of a request that never reaches the network
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        /// The request field that violated a rule, when known
        field: Option<String>,
    },

    /// The call exceeded its deadline and the in-flight transport was dropped
    #[error("Operation timed out after {duration_ms}ms: {operation}")]
    Timeout { operation: String, duration_ms: u64 },

    /// DNS resolution or connection establishment failed
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The upstream responded with a non-2xx status
    #[error("Upstream responded {status}: {body}")]
    Http { status: u16, body: String },

    /// The upstream responded 2xx but flagged the answer as an error
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SearchError {
    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        SearchError::Validation {
            message: message.into(),
            field: field.map(str::to_string),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        SearchError::Config {
            message: message.into(),
        }
    }

    /// Classify a reqwest failure into the transport taxonomy.
    ///
    /// Connection-establishment failures become `Transport` and stay
    /// retryable; everything else (including reqwest's own deadline firing)
    /// is terminal.
    pub fn from_transport(err: reqwest::Error, operation: &str) -> Self {
        if err.is_timeout() {
            SearchError::Timeout {
                operation: operation.to_string(),
                duration_ms: 0,
            }
        } else if err.is_connect() {
            SearchError::Transport {
                message: format!("failed to reach upstream: {}", err),
                source: Some(Box::new(err)),
            }
        } else {
            SearchError::Transport {
                message: format!("request failed: {}", err),
                source: Some(Box::new(err)),
            }
        }
    }

    /// Whether a retry may be attempted.
    ///
    /// Only pure connection-establishment failures qualify: those are known
    /// not to have reached upstream processing. A timeout is ambiguous (the
    /// request may already be executing upstream) and is never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SearchError::Transport { .. })
    }

    /// HTTP status code this error maps to at the relay boundary
    pub fn status_code(&self) -> u16 {
        match self {
            SearchError::Validation { .. } => 400,
            SearchError::Timeout { .. } => 504,
            SearchError::Transport { .. } => 503,
            SearchError::Http { status, .. } => *status,
            SearchError::Upstream { .. } => 502,
            SearchError::Config { .. } => 500,
            SearchError::Io(_) => 500,
            SearchError::Serialization(_) => 500,
        }
    }

    /// Stable machine-readable tag, used in error response bodies
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::Validation { .. } => "validation",
            SearchError::Timeout { .. } => "timeout",
            SearchError::Transport { .. } => "transport",
            SearchError::Http { .. } => "http",
            SearchError::Upstream { .. } => "upstream",
            SearchError::Config { .. } => "config",
            SearchError::Io(_) => "io",
            SearchError::Serialization(_) => "serialization",
        }
    }
}
