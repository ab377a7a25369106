//! Request and response types for the SmartSearch API
//!
//! Queries are built per user action, validated locally, sent once and then
//! discarded; nothing here is persisted.

use crate::error::{SearchError, SearchResult};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Leading bytes every well-formed PDF starts with
pub const PDF_SIGNATURE: &[u8; 4] = b"%PDF";

/// Default upload cap: 50 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// MIME types accepted for multimodal uploads: jpeg/png images plus the
/// common office document formats and PDF.
pub const DEFAULT_ALLOWED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/jpg",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
];

/// A plain text question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextQuery {
    pub question: String,
}

impl TextQuery {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }

    /// Reject empty or whitespace-only questions before any network call
    pub fn validate(&self) -> SearchResult<()> {
        if self.question.trim().is_empty() {
            return Err(SearchError::validation(
                "question must not be empty",
                Some("question"),
            ));
        }
        Ok(())
    }
}

/// Binary attachment of a multimodal query
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type.eq_ignore_ascii_case("application/pdf")
    }
}

/// A free-text prompt paired with a binary attachment
#[derive(Debug, Clone)]
pub struct MultimodalQuery {
    pub prompt: String,
    pub file: UploadFile,
}

impl MultimodalQuery {
    pub fn new(prompt: impl Into<String>, file: UploadFile) -> Self {
        Self {
            prompt: prompt.into(),
            file,
        }
    }

    /// Check the prompt and the attachment against the upload policy
    pub fn validate(&self, policy: &UploadPolicy) -> SearchResult<()> {
        if self.prompt.trim().is_empty() {
            return Err(SearchError::validation(
                "prompt must not be empty",
                Some("prompt"),
            ));
        }
        policy.check(&self.file)
    }
}

/// Upload constraints applied before a multimodal query is transmitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPolicy {
    /// Maximum accepted file size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
    /// Accepted MIME types
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
}

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_allowed_types() -> Vec<String> {
    DEFAULT_ALLOWED_TYPES.iter().map(|t| t.to_string()).collect()
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            allowed_types: default_allowed_types(),
        }
    }
}

impl UploadPolicy {
    pub fn allows_type(&self, content_type: &str) -> bool {
        self.allowed_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(content_type))
    }

    /// Validate a file against the policy.
    ///
    /// For PDFs the leading four bytes must match the `%PDF` signature; a
    /// claimed PDF without it is rejected as corrupt before transmission.
    pub fn check(&self, file: &UploadFile) -> SearchResult<()> {
        if file.data.is_empty() {
            return Err(SearchError::validation("file is empty", Some("file")));
        }

        if file.size() > self.max_upload_bytes {
            return Err(SearchError::validation(
                format!(
                    "file is too large ({} bytes, maximum {} bytes)",
                    file.size(),
                    self.max_upload_bytes
                ),
                Some("file"),
            ));
        }

        if !self.allows_type(&file.content_type) {
            return Err(SearchError::validation(
                format!("unsupported file type: {}", file.content_type),
                Some("file"),
            ));
        }

        if file.is_pdf() && !file.data.starts_with(PDF_SIGNATURE) {
            return Err(SearchError::validation(
                "PDF file is corrupt or invalid (bad signature)",
                Some("file"),
            ));
        }

        Ok(())
    }
}

/// Answer envelope returned by the SmartSearch service.
///
/// Older deployments spell the answer field `reponse`; both spellings
/// deserialize into `answer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(alias = "reponse")]
    pub answer: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub processing_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SearchResponse {
    /// The service reports failures inside a 2xx body through this flag
    pub fn is_error(&self) -> bool {
        self.status.eq_ignore_ascii_case("error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_file(data: &'static [u8]) -> UploadFile {
        UploadFile::new("report.pdf", "application/pdf", data)
    }

    #[test]
    fn empty_question_is_rejected() {
        assert!(TextQuery::new("   ").validate().is_err());
        assert!(TextQuery::new("").validate().is_err());
        assert!(TextQuery::new("what are the course hours?")
            .validate()
            .is_ok());
    }

    #[test]
    fn oversized_file_is_rejected() {
        let policy = UploadPolicy {
            max_upload_bytes: 8,
            ..UploadPolicy::default()
        };
        let file = UploadFile::new("photo.png", "image/png", &b"0123456789"[..]);
        let err = policy.check(&file).unwrap_err();
        assert!(matches!(
            err,
            SearchError::Validation { field: Some(ref f), .. } if f == "file"
        ));
    }

    #[test]
    fn disallowed_mime_type_is_rejected() {
        let policy = UploadPolicy::default();
        let file = UploadFile::new("notes.txt", "text/plain", &b"hello"[..]);
        assert!(policy.check(&file).is_err());
    }

    #[test]
    fn pdf_signature_is_enforced() {
        let policy = UploadPolicy::default();
        assert!(policy.check(&pdf_file(b"%PDF-1.7 rest")).is_ok());
        assert!(policy.check(&pdf_file(b"<html>not a pdf")).is_err());
    }

    #[test]
    fn empty_file_is_rejected() {
        let policy = UploadPolicy::default();
        let file = UploadFile::new("empty.png", "image/png", &b""[..]);
        assert!(policy.check(&file).is_err());
    }

    #[test]
    fn multimodal_query_requires_a_prompt() {
        let policy = UploadPolicy::default();
        let query = MultimodalQuery::new("  ", pdf_file(b"%PDF-1.4"));
        let err = query.validate(&policy).unwrap_err();
        assert!(matches!(
            err,
            SearchError::Validation { field: Some(ref f), .. } if f == "prompt"
        ));
    }

    #[test]
    fn legacy_answer_spelling_deserializes() {
        let body = r#"{"reponse":"pong","status":"ok","processing_time":0.01}"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.answer, "pong");
        assert!(!response.is_error());

        let body = r#"{"answer":"bad question","status":"error","processing_time":0.5}"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert!(response.is_error());
    }
}
