//! HTTP request handlers for the relay server

pub mod health;
pub mod search;
pub mod types;

pub use health::*;
pub use search::*;
pub use types::*;
