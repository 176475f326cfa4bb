//! Domain layer for Docsage.
//!
//! Holds the session, document and chat models, the shared error type, and
//! the traits the infrastructure and interaction crates implement.

pub mod chat;
pub mod config;
pub mod document;
pub mod error;
pub mod session;
pub mod status;
pub mod transport;

pub use error::{DocsageError, Operation, Result};
