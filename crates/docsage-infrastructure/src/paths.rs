//! Unified path management for docsage files.
//!
//! ```text
//! ~/.config/docsage/        # Config directory (or $DOCSAGE_HOME)
//! ├── config.toml           # Client configuration
//! └── session.toml          # Durable session identity
//! ```

use docsage_core::error::{DocsageError, Result};
use std::path::PathBuf;

/// Overrides the base directory for every docsage file.
pub const DOCSAGE_HOME_ENV: &str = "DOCSAGE_HOME";

#[derive(Debug, Clone)]
pub struct DocsagePaths {
    base_dir: PathBuf,
}

impl DocsagePaths {
    /// Uses an explicit base directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolves `$DOCSAGE_HOME`, falling back to the platform config dir.
    pub fn resolve() -> Result<Self> {
        if let Ok(home) = std::env::var(DOCSAGE_HOME_ENV)
            && !home.trim().is_empty()
        {
            return Ok(Self::new(home));
        }

        let config_dir = dirs::config_dir()
            .ok_or_else(|| DocsageError::config("Cannot find config directory"))?;
        Ok(Self::new(config_dir.join("docsage")))
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.toml")
    }

    pub fn session_store_file(&self) -> PathBuf {
        self.base_dir.join("session.toml")
    }
}
