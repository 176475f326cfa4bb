//! Application layer for Docsage.
//!
//! Sequences upload, summarization and chat for one session on top of the
//! core domain types and an injected [`DocumentService`].
//!
//! [`DocumentService`]: docsage_core::transport::DocumentService

pub mod app;
pub mod bootstrap;
pub mod chat_session;
pub mod events;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod view;
pub mod workspace;

pub use app::{DocsageApp, ServiceFactory, http_service_factory};
pub use bootstrap::{AppBootstrap, BootstrapOptions};
pub use chat_session::{ChatSession, ChatSurface, RejectReason, SendOutcome};
pub use events::WorkspaceEvent;
pub use view::SummaryPanel;
pub use workspace::{UploadCompletion, Workspace, WorkspaceSnapshot};
