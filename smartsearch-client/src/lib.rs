//! SmartSearch request client
//!
//! Builds and issues text and multimodal queries against a SmartSearch
//! endpoint (the relay or the service itself), with local validation, a
//! deadline, and a bounded retry for transient transport failures.

pub mod client;

pub use client::{ClientOptions, SearchClient};
