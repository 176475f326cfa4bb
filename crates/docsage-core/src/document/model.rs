//! Uploaded document as tracked by the workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::transport::UploadResult;

/// One uploaded file as known to the client.
///
/// `id` is generated locally and is unrelated to anything the backend stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub filename: String,
    pub page_count: u32,
    /// Upload timestamp (RFC 3339)
    pub uploaded_at: String,
    pub selected: bool,
}

impl Document {
    /// Creates a selected document from one upload result.
    pub fn from_upload(result: &UploadResult) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            filename: result.filename.clone(),
            page_count: result.page_count,
            uploaded_at: Utc::now().to_rfc3339(),
            selected: true,
        }
    }

    /// Human readable age of the upload, relative to `now`.
    pub fn uploaded_ago(&self, now: DateTime<Utc>) -> String {
        let Ok(uploaded) = DateTime::parse_from_rfc3339(&self.uploaded_at) else {
            return String::new();
        };
        let minutes = (now - uploaded.with_timezone(&Utc)).num_minutes();

        match minutes {
            m if m < 1 => "Just now".to_string(),
            m if m < 60 => format!("{}m ago", m),
            m if m < 1440 => format!("{}h ago", m / 60),
            m => format!("{}d ago", m / 1440),
        }
    }
}
