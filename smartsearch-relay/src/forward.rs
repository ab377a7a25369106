//! The upstream hop
//!
//! Owns the outbound HTTP client and the resolved endpoint pair. Text
//! bodies are forwarded verbatim as JSON; multipart bodies are re-encoded
//! part by part into a fresh form so the incoming boundary and headers are
//! never replayed upstream.

use bytes::Bytes;
use reqwest::header::ACCEPT;
use reqwest::multipart;
use smartsearch_core::{
    with_timeout, RelayTarget, SearchError, SearchResult, UpstreamConfig,
};
use std::time::Duration;
use tracing::{debug, info};

/// One decoded part of an incoming multipart body
#[derive(Debug, Clone)]
pub struct ForwardedPart {
    pub name: String,
    /// Present for file parts, absent for plain fields
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl ForwardedPart {
    pub fn field(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            content_type: None,
            data: data.into(),
        }
    }

    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            file_name: Some(file_name.into()),
            content_type,
            data: data.into(),
        }
    }
}

/// Forwards requests to the fixed upstream origin
pub struct UpstreamForwarder {
    http: reqwest::Client,
    target: RelayTarget,
    timeout: Duration,
}

impl UpstreamForwarder {
    /// Resolve the upstream endpoints and build the outbound client once
    pub fn new(upstream: &UpstreamConfig) -> SearchResult<Self> {
        let target = upstream.relay_target()?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("smartsearch-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SearchError::config(format!("failed to build HTTP client: {}", e)))?;

        info!(text_url = %target.text_url, "upstream forwarder ready");

        Ok(Self {
            http,
            target,
            timeout: upstream.timeout(),
        })
    }

    /// Forward a JSON text query verbatim
    pub async fn forward_text(&self, body: serde_json::Value) -> SearchResult<serde_json::Value> {
        debug!(url = %self.target.text_url, "forwarding text query");
        with_timeout(self.send_text(body), self.timeout, "forward_text").await
    }

    /// Re-encode decoded multipart parts and forward them
    pub async fn forward_multimodal(
        &self,
        parts: Vec<ForwardedPart>,
    ) -> SearchResult<serde_json::Value> {
        debug!(
            url = %self.target.multimodal_url,
            parts = parts.len(),
            "forwarding multimodal query"
        );
        with_timeout(
            self.send_multimodal(parts),
            self.timeout,
            "forward_multimodal",
        )
        .await
    }

    async fn send_text(&self, body: serde_json::Value) -> SearchResult<serde_json::Value> {
        let response = self
            .http
            .post(&self.target.text_url)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::from_transport(e, "forward_text"))?;

        Self::relay_response(response).await
    }

    async fn send_multimodal(
        &self,
        parts: Vec<ForwardedPart>,
    ) -> SearchResult<serde_json::Value> {
        // Fresh form, fresh boundary; reqwest sets the Content-Type header
        let mut form = multipart::Form::new();

        for part in parts {
            if let Some(file_name) = part.file_name {
                let content_type = part
                    .content_type
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let attachment = multipart::Part::bytes(part.data.to_vec())
                    .file_name(file_name)
                    .mime_str(&content_type)
                    .map_err(|e| {
                        SearchError::validation(
                            format!("invalid part content type: {}", e),
                            Some("file"),
                        )
                    })?;
                form = form.part(part.name, attachment);
            } else {
                let text = String::from_utf8_lossy(&part.data).into_owned();
                form = form.text(part.name, text);
            }
        }

        let response = self
            .http
            .post(&self.target.multimodal_url)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| SearchError::from_transport(e, "forward_multimodal"))?;

        Self::relay_response(response).await
    }

    /// Map the upstream response to the body the relay returns.
    ///
    /// Non-2xx statuses become `Http` with the upstream error text; 2xx
    /// bodies are passed through as JSON, with a `{"text": ...}` wrapper
    /// when the upstream returns something that is not valid JSON.
    async fn relay_response(response: reqwest::Response) -> SearchResult<serde_json::Value> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response
            .text()
            .await
            .map_err(|e| SearchError::from_transport(e, "read_upstream_response"))?;

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(_) => Ok(serde_json::json!({ "text": raw })),
        }
    }
}
