//! Workspace events broadcast to the presentation layer.

use docsage_core::document::Document;
use serde::Serialize;

/// Notifications published by the workspace as it moves through its states.
///
/// `UploadCompleted` is the signal the orchestrator reacts to when it decides
/// whether to summarize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkspaceEvent {
    UploadStarted { files: usize },
    UploadCompleted { documents: Vec<Document> },
    UploadFailed { message: String },
    SummarizeStarted,
    SummarizeCompleted,
    SummarizeFailed { message: String },
    SelectionChanged { selected: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tagging() {
        let json = serde_json::to_value(WorkspaceEvent::SelectionChanged { selected: 2 }).unwrap();
        assert_eq!(json["type"], "selection_changed");
        assert_eq!(json["selected"], 2);

        let json = serde_json::to_value(WorkspaceEvent::SummarizeStarted).unwrap();
        assert_eq!(json, serde_json::json!({"type": "summarize_started"}));
    }
}
