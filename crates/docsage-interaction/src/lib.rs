//! Backend transport for Docsage.
//!
//! [`HttpDocumentClient`] implements [`DocumentService`] over HTTP. It is
//! constructed with the session context and the backend origin, and every
//! request it makes is scoped to that session.
//!
//! [`DocumentService`]: docsage_core::transport::DocumentService

mod http_client;
mod wire;

pub use http_client::HttpDocumentClient;
