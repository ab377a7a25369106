//! Query forwarding handlers
//!
//! Two routes, one per request shape: JSON text queries and multipart
//! multimodal queries. Each route is bound to exactly one encoding, so a
//! multipart body can never be forwarded as JSON or vice versa.

use super::types::{AnswerResponse, ErrorResponse, TextQueryRequest};
use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use smartsearch_core::SearchError;
use tracing::info;

/// Forward a text query to the upstream service
#[utoipa::path(
    post,
    path = "/api/smartsearch/text",
    tag = "Search",
    summary = "Ask a question",
    request_body = TextQueryRequest,
    responses(
        (status = 200, description = "Upstream answer", body = AnswerResponse),
        (status = 503, description = "Upstream unreachable", body = ErrorResponse),
        (status = 504, description = "Upstream timed out", body = ErrorResponse)
    )
)]
pub async fn text_query(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!("processing text query");

    let answer = state.forwarder.forward_text(body).await?;

    info!("text query forwarded successfully");
    Ok(Json(answer))
}

/// Forward a multimodal (prompt + file) query to the upstream service
#[utoipa::path(
    post,
    path = "/api/smartsearch/multimodal",
    tag = "Search",
    summary = "Ask a question about a file",
    request_body(content_type = "multipart/form-data", description = "prompt field plus file attachment"),
    responses(
        (status = 200, description = "Upstream answer", body = AnswerResponse),
        (status = 400, description = "Malformed multipart body", body = ErrorResponse),
        (status = 503, description = "Upstream unreachable", body = ErrorResponse),
        (status = 504, description = "Upstream timed out", body = ErrorResponse)
    )
)]
pub async fn multimodal_query(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut parts = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        SearchError::validation(format!("failed to parse multipart data: {}", e), None)
    })? {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let data = field.bytes().await.map_err(|e| {
            SearchError::validation(format!("failed to read multipart field: {}", e), None)
        })?;

        let part = match file_name {
            Some(file_name) => {
                info!(file = %file_name, bytes = data.len(), "decoded file part");
                crate::forward::ForwardedPart::file(
                    name.unwrap_or_else(|| "file".to_string()),
                    file_name,
                    content_type,
                    data,
                )
            }
            None => crate::forward::ForwardedPart::field(
                name.unwrap_or_else(|| "field".to_string()),
                data,
            ),
        };
        parts.push(part);
    }

    if parts.is_empty() {
        return Err(SearchError::validation("no multipart data received", None).into());
    }

    let answer = state.forwarder.forward_multimodal(parts).await?;

    info!("multimodal query forwarded successfully");
    Ok(Json(answer))
}

/// Answer bare OPTIONS requests that are not CORS preflights.
///
/// Actual preflights are short-circuited by the CORS layer before routing.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}
