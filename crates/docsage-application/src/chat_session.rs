//! One chat surface: its transcript, input buffer and in-flight flag.
//!
//! The application runs two of these side by side. They share the backend
//! and the chat availability signal, never their transcripts.

use std::sync::Arc;

use docsage_core::chat::Message;
use docsage_core::transport::DocumentService;
use serde::Serialize;
use strum::Display;
use tokio::sync::{Mutex, watch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatSurface {
    /// The main conversation pane.
    Primary,
    /// The pop-out assistant drawer.
    Drawer,
}

/// Why a send did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RejectReason {
    /// No successful summary, or nothing selected.
    #[strum(to_string = "chat is not available yet")]
    Disabled,
    #[strum(to_string = "a question is already being answered")]
    Busy,
    #[strum(to_string = "question is empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was appended and no request was made.
    Rejected(RejectReason),
    Answered(Message),
    /// The request failed; the appended error message is returned.
    Failed(Message),
}

impl SendOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// The assistant message appended by this send, if any.
    pub fn reply(&self) -> Option<&Message> {
        match self {
            Self::Answered(message) | Self::Failed(message) => Some(message),
            Self::Rejected(_) => None,
        }
    }
}

#[derive(Debug, Default)]
struct ChatState {
    transcript: Vec<Message>,
    input: String,
    busy: bool,
}

#[derive(Clone)]
pub struct ChatSession {
    surface: ChatSurface,
    service: Arc<dyn DocumentService>,
    availability: watch::Receiver<bool>,
    state: Arc<Mutex<ChatState>>,
}

impl ChatSession {
    pub fn new(
        surface: ChatSurface,
        service: Arc<dyn DocumentService>,
        availability: watch::Receiver<bool>,
    ) -> Self {
        Self {
            surface,
            service,
            availability,
            state: Arc::new(Mutex::new(ChatState::default())),
        }
    }

    pub fn surface(&self) -> ChatSurface {
        self.surface
    }

    pub fn is_enabled(&self) -> bool {
        *self.availability.borrow()
    }

    pub async fn is_busy(&self) -> bool {
        self.state.lock().await.busy
    }

    pub async fn transcript(&self) -> Vec<Message> {
        self.state.lock().await.transcript.clone()
    }

    pub async fn input(&self) -> String {
        self.state.lock().await.input.clone()
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        self.state.lock().await.input = text.into();
    }

    /// Checks the send preconditions and, when they hold, appends the user
    /// message and marks the surface busy.
    fn admit(&self, state: &mut ChatState, question: &str) -> Result<(), RejectReason> {
        if !self.is_enabled() {
            return Err(RejectReason::Disabled);
        }
        if state.busy {
            return Err(RejectReason::Busy);
        }
        if question.is_empty() {
            return Err(RejectReason::Empty);
        }

        state.transcript.push(Message::user(question));
        state.busy = true;
        Ok(())
    }

    /// Asks one question on this surface.
    ///
    /// A no-op while chat is disabled, while a previous question is still
    /// being answered, or when the trimmed question is empty. Otherwise the
    /// user message is appended before the request is made and exactly one
    /// assistant message follows it.
    pub async fn send(&self, question: &str) -> SendOutcome {
        let question = question.trim();
        {
            let mut state = self.state.lock().await;
            if let Err(reason) = self.admit(&mut *state, question) {
                tracing::debug!("[Chat:{}] Send rejected: {}", self.surface, reason);
                return SendOutcome::Rejected(reason);
            }
        }
        self.complete(question).await
    }

    /// Sends the input buffer. The buffer is cleared only when the send is
    /// accepted.
    pub async fn submit(&self) -> SendOutcome {
        let question = {
            let mut state = self.state.lock().await;
            let question = state.input.trim().to_string();
            if let Err(reason) = self.admit(&mut *state, &question) {
                tracing::debug!("[Chat:{}] Submit rejected: {}", self.surface, reason);
                return SendOutcome::Rejected(reason);
            }
            state.input.clear();
            question
        };
        self.complete(&question).await
    }

    async fn complete(&self, question: &str) -> SendOutcome {
        tracing::info!("[Chat:{}] Asking question ({} chars)", self.surface, question.len());
        let result = self.service.ask(question).await;

        let outcome = match result {
            Ok(answer) => SendOutcome::Answered(Message::assistant(answer)),
            Err(e) => {
                tracing::warn!("[Chat:{}] Question failed: {}", self.surface, e);
                SendOutcome::Failed(Message::failure(e))
            }
        };

        let mut state = self.state.lock().await;
        if let Some(reply) = outcome.reply() {
            state.transcript.push(reply.clone());
        }
        state.busy = false;
        outcome
    }
}
