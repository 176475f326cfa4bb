//! Conversation message types.
//!
//! Transcripts are append-only sequences of these. A message is never edited
//! after it is appended.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DocsageError;
use crate::transport::AskResult;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Distinguishes regular turns from failures rendered into the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "error", rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    /// The request behind this assistant turn failed.
    Error(DocsageError),
}

/// A pointer from an answer back to a source file and page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub source_file: String,
    pub page_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Citation {
    /// Short label, e.g. `report.pdf p.4`.
    pub fn label(&self) -> String {
        format!("{} p.{}", self.source_file, self.page_number)
    }
}

/// A single turn in a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub kind: MessageKind,
    pub content: String,
    /// Only ever populated on assistant messages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_count: Option<u32>,
    /// Creation time (RFC 3339)
    pub timestamp: String,
}

impl Message {
    fn new(role: MessageRole, kind: MessageKind, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            kind,
            content,
            citations: Vec::new(),
            chunk_count: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, MessageKind::Text, content.into())
    }

    pub fn assistant(result: AskResult) -> Self {
        let mut message = Self::new(MessageRole::Assistant, MessageKind::Text, result.answer);
        message.citations = result.citations.unwrap_or_default();
        message.chunk_count = result.chunk_count;
        message
    }

    /// An assistant turn describing a failed request.
    ///
    /// The content is the rendered `Error: <message>` text; the error itself
    /// stays available through [`Message::error`].
    pub fn failure(error: DocsageError) -> Self {
        let content = format!("Error: {}", error);
        Self::new(MessageRole::Assistant, MessageKind::Error(error), content)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, MessageKind::Error(_))
    }

    pub fn error(&self) -> Option<&DocsageError> {
        match &self.kind {
            MessageKind::Error(e) => Some(e),
            MessageKind::Text => None,
        }
    }

    /// "Answer based on N document chunks", for assistant answers that carry
    /// a chunk count or citations.
    pub fn chunk_badge(&self) -> Option<String> {
        if self.role != MessageRole::Assistant {
            return None;
        }
        let count = self
            .chunk_count
            .filter(|c| *c > 0)
            .unwrap_or(self.citations.len() as u32);
        if count == 0 {
            return None;
        }
        let noun = if count == 1 { "chunk" } else { "chunks" };
        Some(format!("Answer based on {} document {}", count, noun))
    }
}
