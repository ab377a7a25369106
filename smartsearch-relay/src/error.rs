//! Error-to-response mapping for the API surface
//!
//! Every failure branch produces a structured JSON body with the mapped
//! status code; nothing is swallowed silently and no stack trace is echoed
//! to the caller.

use crate::handlers::types::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use smartsearch_core::SearchError;

/// Wrapper that turns a [`SearchError`] into an HTTP response
#[derive(Debug)]
pub struct ApiError(pub SearchError);

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0;

        match &error {
            SearchError::Validation { .. } => {
                tracing::debug!(error = %error, "rejected request");
            }
            SearchError::Timeout { .. } | SearchError::Transport { .. } => {
                tracing::warn!(error = %error, "upstream unreachable");
            }
            SearchError::Http { .. } | SearchError::Upstream { .. } => {
                tracing::warn!(error = %error, "upstream failure");
            }
            _ => {
                tracing::error!(error = %error, "internal relay error");
            }
        }

        let status = StatusCode::from_u16(error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = Json(ErrorResponse {
            error: error.to_string(),
            kind: error.kind().to_string(),
        });

        (status, body).into_response()
    }
}
