//! Error types for the Docsage client.

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// Message shown whenever the backend could not be reached at all.
pub const BACKEND_UNREACHABLE_MESSAGE: &str =
    "Backend unreachable. Please ensure the server is running.";

/// The three logical backend operations, as they are named in error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Operation {
    #[strum(to_string = "Upload")]
    Upload,
    #[strum(to_string = "Summarization")]
    Summarize,
    #[strum(to_string = "Chat")]
    Ask,
}

/// A shared error type for the entire Docsage client.
///
/// Validation, HTTP and connectivity failures are distinct variants so the
/// presentation layer can decide how to surface each one. Everything else
/// (storage, serialization, configuration) propagates unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocsageError {
    /// Client-side rejection before any network call was made.
    #[error("{0}")]
    Validation(String),

    /// The backend answered with a non-2xx status.
    #[error("{operation} failed ({status}): {body}")]
    Http {
        operation: Operation,
        status: u16,
        body: String,
    },

    /// No response was received (connection refused, DNS failure, ...).
    #[error("{}", BACKEND_UNREACHABLE_MESSAGE)]
    BackendUnreachable,

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Durable client storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocsageError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an Http error for the given operation
    pub fn http(operation: Operation, status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            operation,
            status,
            body: body.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    pub fn is_backend_unreachable(&self) -> bool {
        matches!(self, Self::BackendUnreachable)
    }

    /// HTTP status code, if the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Troubleshooting guidance shown next to connectivity failures.
    ///
    /// Empty for every other kind of error.
    pub fn troubleshooting_hints(&self) -> &'static [&'static str] {
        match self {
            Self::BackendUnreachable => &[
                "Ensure backend is running",
                "Check CORS and network access to the backend",
                "Verify the configured backend origin (DOCSAGE_API_BASE_URL)",
            ],
            _ => &[],
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DocsageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DocsageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DocsageError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for DocsageError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error at crate boundaries
impl From<anyhow::Error> for DocsageError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, DocsageError>`.
pub type Result<T> = std::result::Result<T, DocsageError>;
