//! Session identity types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Storage key holding the session identifier.
pub const SESSION_ID_KEY: &str = "session_id";

/// Storage key holding the session creation timestamp (RFC 3339).
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";

/// Opaque identifier scoping every backend interaction to one workspace.
///
/// An empty identifier means durable storage was unavailable and the session
/// is "not yet available"; it must never be sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a fresh random identifier (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The session identity injected into the transport and the state machine.
///
/// Built once at startup. A reset produces a brand new context instead of
/// mutating this one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    session_id: SessionId,
    created_at: Option<String>,
}

impl SessionContext {
    pub fn new(session_id: SessionId, created_at: Option<String>) -> Self {
        Self {
            session_id,
            created_at,
        }
    }

    /// Context for a client without durable storage.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    pub fn is_available(&self) -> bool {
        !self.session_id.is_empty()
    }
}

/// Session metadata for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub created_at: Option<String>,
}
