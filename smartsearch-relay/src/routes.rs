//! Route definitions for the relay server

use crate::{handlers, openapi, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Query forwarding, one route per request shape
        .route(
            "/smartsearch/text",
            post(handlers::text_query).options(handlers::preflight),
        )
        .route(
            "/smartsearch/multimodal",
            post(handlers::multimodal_query).options(handlers::preflight),
        )
        // API description
        .route("/openapi.json", get(openapi::openapi_spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RelayConfig;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check_route() {
        let state = AppState::new(RelayConfig::default()).unwrap();
        let app = api_routes().with_state(state);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_text_route_rejects_non_json_bodies() {
        let state = AppState::new(RelayConfig::default()).unwrap();
        let app = api_routes().with_state(state);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/smartsearch/text")
                    .header("content-type", "text/plain")
                    .body(axum::body::Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        // the JSON extractor refuses the body before any forwarding
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
