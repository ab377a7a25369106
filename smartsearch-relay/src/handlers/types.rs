//! Request and response types exposed by the relay API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Text query request
#[derive(Debug, Deserialize, ToSchema)]
pub struct TextQueryRequest {
    #[schema(example = "What are the enrollment requirements?")]
    pub question: String,
}

/// Answer envelope relayed from the SmartSearch service
#[derive(Debug, Serialize, ToSchema)]
pub struct AnswerResponse {
    pub answer: String,
    #[schema(example = "ok")]
    pub status: String,
    pub processing_time: f64,
    pub source: Option<String>,
}

/// Structured error body attached to every failure response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Machine-readable failure kind
    #[schema(example = "transport")]
    pub kind: String,
}

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}
