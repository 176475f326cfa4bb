//! Text the presentation layer renders from a workspace snapshot.

use docsage_core::chat::Citation;
use docsage_core::status::{SummaryStatus, UploadStatus, count_noun};

use crate::workspace::WorkspaceSnapshot;

/// What the summary panel should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryPanel {
    /// No documents in the workspace.
    Empty,
    /// Documents exist but no summary has been requested yet.
    Pending { headline: String },
    Loading { headline: String, detail: String },
    Failed { headline: String, message: String },
    Ready {
        headline: String,
        summary: String,
        citations: Vec<Citation>,
    },
}

impl SummaryPanel {
    pub const EMPTY_TITLE: &'static str = "No documents uploaded";
}

impl WorkspaceSnapshot {
    pub fn summary_panel(&self) -> SummaryPanel {
        let count = self.documents.len();
        if count == 0 {
            return SummaryPanel::Empty;
        }

        let headline = format!("Combined summary from {}", count_noun(count, "document"));
        match (self.summary_status, &self.summary) {
            (SummaryStatus::Loading, _) => SummaryPanel::Loading {
                headline,
                detail: format!("Analyzing {}", count_noun(count, "document")),
            },
            (SummaryStatus::Failed, _) => SummaryPanel::Failed {
                headline,
                message: self
                    .summary_error
                    .clone()
                    .unwrap_or_else(|| "Failed to generate summary".to_string()),
            },
            (SummaryStatus::Succeeded, Some(summary)) => SummaryPanel::Ready {
                headline,
                summary: summary.summary.clone(),
                citations: summary.citations().to_vec(),
            },
            _ => SummaryPanel::Pending { headline },
        }
    }

    /// "Successfully uploaded N documents" plus one line per file.
    pub fn upload_report(&self) -> Option<Vec<String>> {
        if self.upload_status != UploadStatus::Succeeded {
            return None;
        }
        let mut lines = vec![format!(
            "Successfully uploaded {}",
            count_noun(self.last_upload.len(), "document")
        )];
        lines.extend(self.last_upload.iter().map(|result| {
            format!(
                "{} ({})",
                result.filename,
                count_noun(result.page_count as usize, "page")
            )
        }));
        Some(lines)
    }

    /// Document list header, e.g. `2 of 3 selected`.
    pub fn selection_header(&self) -> String {
        format!("{} of {} selected", self.selected_count(), self.documents.len())
    }

    /// Placeholder shown on an empty chat transcript.
    pub fn chat_hint(&self) -> String {
        if self.chat_enabled() {
            format!(
                "Ask questions across {} indexed {}",
                self.documents.len(),
                if self.documents.len() == 1 {
                    "document"
                } else {
                    "documents"
                }
            )
        } else {
            "Upload documents and wait for indexing to complete".to_string()
        }
    }

    pub fn chatbot_status(&self) -> &'static str {
        self.summary_status.chatbot_label()
    }
}
