//! Backend service contract.
//!
//! The three operations are implicitly scoped to the session the
//! implementation was constructed with. Callers never pass document lists or
//! identifiers; the backend alone decides which documents belong to a session.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chat::Citation;
use crate::document::UploadFile;
use crate::error::Result;

/// One accepted file as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub page_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Citation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_count: Option<u32>,
}

impl SummaryResult {
    pub fn citations(&self) -> &[Citation] {
        self.citations.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResult {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Citation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_count: Option<u32>,
}

/// Transport to the document-intelligence backend.
///
/// Failures are normalized into [`DocsageError`](crate::DocsageError):
/// `Http` for non-2xx responses, `BackendUnreachable` when no response
/// arrived. No implementation retries.
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Uploads a batch. Returns one result per accepted file in the order the
    /// backend reported them.
    async fn upload(&self, files: &[UploadFile]) -> Result<Vec<UploadResult>>;

    /// Summarizes everything the backend holds for the session.
    async fn summarize(&self) -> Result<SummaryResult>;

    async fn ask(&self, question: &str) -> Result<AskResult>;
}
