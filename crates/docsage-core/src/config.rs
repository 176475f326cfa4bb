//! Client configuration model.
//!
//! The only setting that affects core behavior is the backend origin. It is
//! resolved once at startup by the infrastructure layer and then passed down
//! by value.

use serde::{Deserialize, Serialize};

/// Backend origin used when nothing else is configured.
pub const DEFAULT_BACKEND_ORIGIN: &str = "http://localhost:8000";

/// Environment variable that overrides the configured backend origin.
pub const BACKEND_ORIGIN_ENV: &str = "DOCSAGE_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin, e.g. `https://docs.example.com`.
    pub backend_origin: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_origin: DEFAULT_BACKEND_ORIGIN.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_backend_origin(mut self, origin: impl Into<String>) -> Self {
        self.backend_origin = origin.into();
        self
    }

    /// Backend origin without a trailing slash, ready for path joining.
    pub fn normalized_origin(&self) -> &str {
        self.backend_origin.trim_end_matches('/')
    }
}
