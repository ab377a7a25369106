//! OpenAPI specification for the relay server

use axum::response::Json;
use utoipa::OpenApi;

use crate::handlers::types::{AnswerResponse, ErrorResponse, HealthResponse, TextQueryRequest};

/// Main OpenAPI specification for the SmartSearch relay
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SmartSearch Relay API",
        version = "0.1.0",
        description = "Same-origin relay in front of the SmartSearch RAG service"
    ),
    paths(
        crate::handlers::health_check,
        crate::handlers::text_query,
        crate::handlers::multimodal_query,
    ),
    components(schemas(
        TextQueryRequest,
        AnswerResponse,
        ErrorResponse,
        HealthResponse,
    )),
    tags(
        (name = "Search", description = "Query forwarding"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Serve the generated specification
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
