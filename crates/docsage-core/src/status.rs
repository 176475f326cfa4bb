//! Workspace sequencing states.
//!
//! Upload and summarization progress independently:
//! `Idle -> Uploading -> Succeeded | Failed` and
//! `Idle -> Loading -> Succeeded | Failed`.

use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SummaryStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl SummaryStatus {
    /// Status line shown on the chat surfaces.
    pub fn chatbot_label(&self) -> &'static str {
        match self {
            SummaryStatus::Loading => "Indexing Documents...",
            SummaryStatus::Succeeded => "Ready",
            SummaryStatus::Failed => "Error",
            SummaryStatus::Idle => "Upload documents to begin",
        }
    }
}

/// `"1 document"`, `"3 documents"`.
pub fn count_noun(count: usize, singular: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}s", count, singular)
    }
}
