//! SmartSearch Relay
//!
//! A same-origin HTTP hop in front of the SmartSearch RAG service: it
//! accepts the two query shapes (JSON text, multipart file upload),
//! re-encodes them and forwards to the fixed upstream origin, mapping
//! transport failures to HTTP status codes and attaching permissive CORS
//! headers to every response.

pub mod error;
pub mod forward;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use server::RelayServer;
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method,
    },
    Router,
};
use smartsearch_core::{SearchConfig, SearchError};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    // Permissive CORS on every response, error responses included; the
    // layer also short-circuits preflight requests before they reach the
    // handlers.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // Leave headroom above the upload cap for the multipart framing
    let body_limit = state.config.search.upload.max_upload_bytes as usize + 1024 * 1024;

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Configuration for the relay server
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable development mode
    pub dev_mode: bool,
    /// Upstream, client and upload settings
    pub search: SearchConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            dev_mode: false,
            search: SearchConfig::default(),
        }
    }
}

impl RelayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut search = SearchConfig::default();
        search.apply_env_overrides();

        Self {
            host: std::env::var("SMARTSEARCH_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("SMARTSEARCH_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            dev_mode: std::env::var("SMARTSEARCH_DEV_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            search,
        }
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the relay server
#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] SearchError),
}

/// Result type for relay server operations
pub type RelayResult<T> = Result<T, RelayError>;
