//! SmartSearch Core - shared types and infrastructure
//!
//! This crate defines the request/response types, the error taxonomy, the
//! configuration surface and the async helpers shared by the SmartSearch
//! client and relay.

pub mod async_utils;
pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use async_utils::*;
pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use bytes::Bytes;
pub use tokio;
pub use tracing;
