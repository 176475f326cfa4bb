//! Request and response bodies exchanged with the backend.

use docsage_core::transport::UploadResult;
use serde::{Deserialize, Serialize};

pub(crate) const UPLOAD_PATH: &str = "/upload";
pub(crate) const SUMMARIZE_PATH: &str = "/summarize/upload";
pub(crate) const CHAT_PATH: &str = "/chat";

/// Multipart field name repeated once per uploaded file.
pub(crate) const UPLOAD_FIELD: &str = "files";

pub(crate) const SESSION_QUERY_PARAM: &str = "session_id";

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub session_id: &'a str,
    pub question: &'a str,
}

/// The upload endpoint answers with an array for multi-file batches and
/// with a bare object for a single file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UploadResponse {
    Many(Vec<UploadResult>),
    One(UploadResult),
}

impl UploadResponse {
    pub(crate) fn into_results(self) -> Vec<UploadResult> {
        match self {
            Self::Many(results) => results,
            Self::One(result) => vec![result],
        }
    }
}
