//! Application state
//!
//! The forwarder and configuration are built once at startup and shared
//! through axum state; requests hold no other shared data.

use crate::forward::UpstreamForwarder;
use crate::{RelayConfig, RelayResult};
use std::sync::Arc;
use tracing::info;

/// Shared state for the relay server
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: RelayConfig,
    /// Outbound client for the fixed upstream
    pub forwarder: Arc<UpstreamForwarder>,
}

impl AppState {
    pub fn new(config: RelayConfig) -> RelayResult<Self> {
        config.search.validate()?;

        let forwarder = UpstreamForwarder::new(&config.search.upstream)?;

        info!(
            upstream = %config.search.upstream.origin,
            "application state initialized"
        );

        Ok(Self {
            config,
            forwarder: Arc::new(forwarder),
        })
    }
}
