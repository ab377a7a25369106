//! The outbound query client
//!
//! One upstream call per user action: validate, serialize, send under a
//! deadline, normalize the result. The client is constructed once at
//! application start and passed to callers; it holds no mutable state.

use reqwest::header::ACCEPT;
use reqwest::multipart;
use smartsearch_core::{
    retry_transient, with_timeout, ClientConfig, MultimodalQuery, SearchConfig, SearchError,
    SearchResponse, SearchResult, TextQuery, UploadFile, UploadPolicy,
};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Client construction parameters
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL the two endpoints hang off, e.g.
    /// `http://127.0.0.1:8080/api/smartsearch` or
    /// `https://smartsearch.myfad.org/smartsearch`
    pub base_url: String,
    /// Deadline for one query, measured from call start
    pub request_timeout: Duration,
    /// Additional attempts after a transient transport failure
    pub max_retries: u32,
    /// Upload constraints applied before transmission
    pub upload_policy: UploadPolicy,
}

impl ClientOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        let defaults = ClientConfig::default();
        Self {
            base_url: base_url.into(),
            request_timeout: defaults.request_timeout(),
            max_retries: defaults.max_retries,
            upload_policy: UploadPolicy::default(),
        }
    }

    /// Derive options from a loaded configuration, pointing the client
    /// directly at the configured upstream.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            base_url: format!(
                "{}{}",
                config.upstream.origin.trim_end_matches('/'),
                config.upstream.service_path
            ),
            request_timeout: config.client.request_timeout(),
            max_retries: config.client.max_retries,
            upload_policy: config.upload.clone(),
        }
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn upload_policy(mut self, policy: UploadPolicy) -> Self {
        self.upload_policy = policy;
        self
    }
}

/// Client for the SmartSearch text and multimodal endpoints
#[derive(Debug)]
pub struct SearchClient {
    http: reqwest::Client,
    options: ClientOptions,
}

impl SearchClient {
    /// Create a new client
    pub fn new(options: ClientOptions) -> SearchResult<Self> {
        let _: Url = options
            .base_url
            .parse()
            .map_err(|e| SearchError::config(format!("invalid base URL: {}", e)))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("smartsearch-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SearchError::config(format!("failed to build HTTP client: {}", e)))?;

        info!(base_url = %options.base_url, "created SmartSearch client");

        Ok(Self { http, options })
    }

    /// Send a text question and return the normalized answer.
    ///
    /// Empty or whitespace-only questions are rejected before any network
    /// call.
    pub async fn send_text(&self, question: &str) -> SearchResult<SearchResponse> {
        let query = TextQuery::new(question);
        query.validate()?;

        let url = self.endpoint("text");
        debug!(url = %url, length = question.len(), "sending text query");

        with_timeout(
            retry_transient(
                || self.post_text(&url, &query),
                self.options.max_retries,
                "send_text",
            ),
            self.options.request_timeout,
            "send_text",
        )
        .await
    }

    /// Send a prompt plus file attachment and return the normalized answer.
    ///
    /// The upload policy (size cap, MIME allowlist, PDF signature) is
    /// enforced before transmission.
    pub async fn send_multimodal(
        &self,
        prompt: &str,
        file: UploadFile,
    ) -> SearchResult<SearchResponse> {
        let query = MultimodalQuery::new(prompt, file);
        query.validate(&self.options.upload_policy)?;

        let url = self.endpoint("multimodal");
        debug!(
            url = %url,
            file = %query.file.file_name,
            content_type = %query.file.content_type,
            bytes = query.file.size(),
            "sending multimodal query"
        );

        with_timeout(
            retry_transient(
                || self.post_multimodal(&url, &query),
                self.options.max_retries,
                "send_multimodal",
            ),
            self.options.request_timeout,
            "send_multimodal",
        )
        .await
    }

    /// Current client options
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.options.base_url.trim_end_matches('/'), name)
    }

    async fn post_text(&self, url: &str, query: &TextQuery) -> SearchResult<SearchResponse> {
        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .json(query)
            .send()
            .await
            .map_err(|e| SearchError::from_transport(e, "send_text"))?;

        Self::normalize(response).await
    }

    async fn post_multimodal(
        &self,
        url: &str,
        query: &MultimodalQuery,
    ) -> SearchResult<SearchResponse> {
        // The form is consumed per attempt, so it is rebuilt here rather
        // than shared with the retry loop. No Content-Type header is set
        // explicitly; reqwest computes the multipart boundary.
        let part = multipart::Part::bytes(query.file.data.to_vec())
            .file_name(query.file.file_name.clone())
            .mime_str(&query.file.content_type)
            .map_err(|e| {
                SearchError::validation(format!("invalid content type: {}", e), Some("file"))
            })?;

        let form = multipart::Form::new()
            .text("prompt", query.prompt.clone())
            .part("file", part);

        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| SearchError::from_transport(e, "send_multimodal"))?;

        Self::normalize(response).await
    }

    /// Map a transport response to a typed result.
    ///
    /// Non-2xx statuses carry the upstream body back as `Http`; a 2xx body
    /// whose own status flag says "error" is an `Upstream` failure.
    async fn normalize(response: reqwest::Response) -> SearchResult<SearchResponse> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            // 503 marks a connection-level failure surfaced by the relay;
            // it is the one status that stays retryable.
            if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
                return Err(SearchError::Transport {
                    message: format!("service unavailable: {}", body),
                    source: None,
                });
            }

            return Err(SearchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::from_transport(e, "read_response"))?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;

        if parsed.is_error() {
            return Err(SearchError::Upstream {
                message: parsed.answer,
            });
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_cleanly() {
        let client =
            SearchClient::new(ClientOptions::new("http://localhost:8080/api/smartsearch/"))
                .unwrap();
        assert_eq!(
            client.endpoint("text"),
            "http://localhost:8080/api/smartsearch/text"
        );
        assert_eq!(
            client.endpoint("multimodal"),
            "http://localhost:8080/api/smartsearch/multimodal"
        );
    }

    #[test]
    fn options_default_to_the_client_config() {
        let options = ClientOptions::new("http://localhost:8080");
        assert_eq!(options.max_retries, 1);
        assert_eq!(options.request_timeout, Duration::from_secs(120));
    }

    #[test]
    fn options_derive_from_search_config() {
        let config = SearchConfig::default();
        let options = ClientOptions::from_config(&config);
        assert_eq!(
            options.base_url,
            "https://smartsearch.myfad.org/smartsearch"
        );
    }

    #[test]
    fn bad_base_url_is_a_config_error() {
        let err = SearchClient::new(ClientOptions::new("not a url")).unwrap_err();
        assert!(matches!(err, SearchError::Config { .. }));
    }
}
