//! Relay server
//!
//! Axum server setup and lifecycle.

use crate::{create_app, AppState, RelayConfig, RelayError, RelayResult};
use axum::serve;
use smartsearch_core::SearchConfig;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main relay server
pub struct RelayServer {
    config: RelayConfig,
    state: AppState,
}

impl RelayServer {
    /// Create a new relay server
    pub fn new(config: RelayConfig) -> RelayResult<Self> {
        let state = AppState::new(config.clone())?;

        Ok(Self { config, state })
    }

    /// Start the server and serve until shutdown
    pub async fn start(self) -> RelayResult<()> {
        let address = self.config.address();

        info!("starting SmartSearch relay");
        info!(address = %address, upstream = %self.config.search.upstream.origin, "listening");

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(RelayError::Server)?;

        if let Err(e) = serve(listener, app).await {
            error!(error = %e, "server error");
            return Err(RelayError::Server(e));
        }

        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Builder for RelayServer
pub struct RelayServerBuilder {
    config: RelayConfig,
}

impl RelayServerBuilder {
    /// Create a new server builder from the environment defaults
    pub fn new() -> Self {
        Self {
            config: RelayConfig::from_env(),
        }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Enable development mode
    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.config.dev_mode = dev_mode;
        self
    }

    /// Override the upstream origin
    pub fn upstream_origin<S: Into<String>>(mut self, origin: S) -> Self {
        self.config.search.upstream.origin = origin.into();
        self
    }

    /// Replace the whole search configuration
    pub fn search_config(mut self, search: SearchConfig) -> Self {
        self.config.search = search;
        self
    }

    /// Build the server
    pub fn build(self) -> RelayResult<RelayServer> {
        RelayServer::new(self.config)
    }
}

impl Default for RelayServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
