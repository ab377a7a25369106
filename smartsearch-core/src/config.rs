//! Configuration management
//!
//! Every tunable the deployments disagreed on (upstream origin, timeouts,
//! upload cap) lives here instead of being hard-coded at call sites.

use crate::error::{SearchError, SearchResult};
use crate::types::UploadPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// The fixed upstream the relay forwards to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Origin of the RAG service, e.g. `https://smartsearch.myfad.org`
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Path prefix of the service endpoints
    #[serde(default = "default_service_path")]
    pub service_path: String,
    /// Deadline for a single forwarded call, in seconds
    #[serde(default = "default_upstream_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_origin() -> String {
    "https://smartsearch.myfad.org".to_string()
}

fn default_service_path() -> String {
    "/smartsearch".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    30
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            service_path: default_service_path(),
            timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve the two endpoint URLs once at startup
    pub fn relay_target(&self) -> SearchResult<RelayTarget> {
        let origin: Url = self
            .origin
            .parse()
            .map_err(|e| SearchError::config(format!("invalid upstream origin: {}", e)))?;

        let base = format!(
            "{}{}",
            origin.as_str().trim_end_matches('/'),
            self.service_path
        );

        Ok(RelayTarget {
            text_url: format!("{}/text", base),
            multimodal_url: format!("{}/multimodal", base),
        })
    }
}

/// Resolved upstream endpoints. Built once, never mutated at runtime.
#[derive(Debug, Clone)]
pub struct RelayTarget {
    pub text_url: String,
    pub multimodal_url: String,
}

/// Request client tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Deadline for one query, measured from call start, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Additional attempts after a transient transport failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_max_retries() -> u32 {
    1
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Top-level configuration for client and relay
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub upload: UploadPolicy,
}

impl SearchConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> SearchResult<Self> {
        let content = std::fs::read_to_string(&path)?;
        let config: SearchConfig = toml::from_str(&content)
            .map_err(|e| SearchError::config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SMARTSEARCH_*` environment overrides on top of the current
    /// values. Unset variables leave the existing value in place.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(origin) = std::env::var("SMARTSEARCH_UPSTREAM_ORIGIN") {
            self.upstream.origin = origin;
        }
        if let Ok(path) = std::env::var("SMARTSEARCH_SERVICE_PATH") {
            self.upstream.service_path = path;
        }
        if let Ok(secs) = std::env::var("SMARTSEARCH_UPSTREAM_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                self.upstream.timeout_secs = secs;
            }
        }
        if let Ok(secs) = std::env::var("SMARTSEARCH_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                self.client.request_timeout_secs = secs;
            }
        }
        if let Ok(retries) = std::env::var("SMARTSEARCH_MAX_RETRIES") {
            if let Ok(retries) = retries.parse() {
                self.client.max_retries = retries;
            }
        }
        if let Ok(bytes) = std::env::var("SMARTSEARCH_MAX_UPLOAD_BYTES") {
            if let Ok(bytes) = bytes.parse() {
                self.upload.max_upload_bytes = bytes;
            }
        }
    }

    /// Validate the configuration before anything is constructed from it
    pub fn validate(&self) -> SearchResult<()> {
        self.upstream.relay_target()?;

        if self.upstream.timeout_secs == 0 {
            return Err(SearchError::config(
                "upstream.timeout_secs must be greater than 0",
            ));
        }

        if self.client.request_timeout_secs == 0 {
            return Err(SearchError::config(
                "client.request_timeout_secs must be greater than 0",
            ));
        }

        // Queries are not idempotent upstream; more than two extra attempts
        // is never acceptable.
        if self.client.max_retries > 2 {
            return Err(SearchError::config("client.max_retries must be at most 2"));
        }

        if self.upload.max_upload_bytes == 0 {
            return Err(SearchError::config(
                "upload.max_upload_bytes must be greater than 0",
            ));
        }

        if self.upload.allowed_types.is_empty() {
            return Err(SearchError::config(
                "upload.allowed_types must not be empty",
            ));
        }

        Ok(())
    }
}
