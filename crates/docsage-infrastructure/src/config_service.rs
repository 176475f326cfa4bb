//! Configuration service.
//!
//! Resolves the [`ClientConfig`] once at startup. The backend origin is taken
//! from, in priority order: an explicit override, the `DOCSAGE_API_BASE_URL`
//! environment variable, `config.toml`, and finally the built-in default.

use crate::storage::AtomicTomlFile;
use docsage_core::config::{BACKEND_ORIGIN_ENV, ClientConfig, DEFAULT_BACKEND_ORIGIN};
use docsage_core::error::{DocsageError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the backend origin came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginSource {
    Override,
    Environment,
    ConfigFile,
    Fallback,
}

/// The resolved configuration plus diagnostics about how it was resolved.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: ClientConfig,
    pub origin_source: OriginSource,
}

impl ResolvedConfig {
    /// One-line description of the backend origin for diagnostics.
    pub fn describe_origin(&self) -> String {
        match self.origin_source {
            OriginSource::Fallback => format!(
                "{} (NOT SET, using fallback)",
                self.config.backend_origin
            ),
            OriginSource::Override => format!("{} (command line)", self.config.backend_origin),
            OriginSource::Environment => {
                format!("{} (${})", self.config.backend_origin, BACKEND_ORIGIN_ENV)
            }
            OriginSource::ConfigFile => format!("{} (config.toml)", self.config.backend_origin),
        }
    }

    /// Plain `http://` to anything other than a loopback host.
    pub fn is_insecure_remote(&self) -> bool {
        let origin = self.config.backend_origin.to_ascii_lowercase();
        let Some(rest) = origin.strip_prefix("http://") else {
            return false;
        };
        let authority = rest.split('/').next().unwrap_or_default();
        let host = match authority.strip_prefix('[') {
            Some(v6) => v6.split(']').next().unwrap_or_default(),
            None => authority.split(':').next().unwrap_or_default(),
        };
        !matches!(host, "localhost" | "127.0.0.1" | "::1")
    }
}

/// On-disk shape of `config.toml`; every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFileDto {
    #[serde(default)]
    backend_origin: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConfigService {
    config_file: PathBuf,
    origin_override: Option<String>,
    env_origin: Option<String>,
}

impl ConfigService {
    /// Creates a service reading `config_file` and the process environment.
    pub fn new(config_file: PathBuf) -> Self {
        Self {
            config_file,
            origin_override: None,
            env_origin: std::env::var(BACKEND_ORIGIN_ENV).ok(),
        }
    }

    /// Highest-priority origin, e.g. from a command line flag.
    pub fn with_origin_override(mut self, origin: Option<String>) -> Self {
        self.origin_override = origin;
        self
    }

    /// Replaces the environment value captured at construction.
    pub fn with_env_origin(mut self, origin: Option<String>) -> Self {
        self.env_origin = origin;
        self
    }

    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let file = AtomicTomlFile::<ConfigFileDto>::new(self.config_file.clone());
        let from_file = file.load()?.unwrap_or_default();

        let mut config = ClientConfig::default();

        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let origin_source = if let Some(origin) = non_empty(&self.origin_override) {
            config.backend_origin = origin;
            OriginSource::Override
        } else if let Some(origin) = non_empty(&self.env_origin) {
            config.backend_origin = origin;
            OriginSource::Environment
        } else if let Some(origin) = non_empty(&from_file.backend_origin) {
            config.backend_origin = origin;
            OriginSource::ConfigFile
        } else {
            config.backend_origin = DEFAULT_BACKEND_ORIGIN.to_string();
            OriginSource::Fallback
        };

        if !config.backend_origin.starts_with("http://")
            && !config.backend_origin.starts_with("https://")
        {
            return Err(DocsageError::config(format!(
                "Backend origin must start with http:// or https://: {}",
                config.backend_origin
            )));
        }

        let resolved = ResolvedConfig {
            config,
            origin_source,
        };

        if resolved.is_insecure_remote() {
            tracing::warn!(
                "[Config] Backend origin uses plain HTTP: {}",
                resolved.config.backend_origin
            );
        }
        tracing::debug!("[Config] Backend origin: {}", resolved.describe_origin());

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> ConfigService {
        ConfigService::new(dir.path().join("config.toml")).with_env_origin(None)
    }

    #[test]
    fn test_fallback_when_nothing_set() {
        let dir = TempDir::new().unwrap();
        let resolved = service(&dir).resolve().unwrap();
        assert_eq!(resolved.config.backend_origin, DEFAULT_BACKEND_ORIGIN);
        assert_eq!(resolved.origin_source, OriginSource::Fallback);
        assert!(resolved.describe_origin().contains("NOT SET"));
        assert!(!resolved.is_insecure_remote());
    }

    #[test]
    fn test_config_file_then_env_then_override() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "backend_origin = \"https://file.example.com\"\n",
        )
        .unwrap();

        let resolved = service(&dir).resolve().unwrap();
        assert_eq!(resolved.config.backend_origin, "https://file.example.com");
        assert_eq!(resolved.origin_source, OriginSource::ConfigFile);

        let resolved = service(&dir)
            .with_env_origin(Some("https://env.example.com".to_string()))
            .resolve()
            .unwrap();
        assert_eq!(resolved.config.backend_origin, "https://env.example.com");
        assert_eq!(resolved.origin_source, OriginSource::Environment);

        let resolved = service(&dir)
            .with_env_origin(Some("https://env.example.com".to_string()))
            .with_origin_override(Some("https://cli.example.com".to_string()))
            .resolve()
            .unwrap();
        assert_eq!(resolved.config.backend_origin, "https://cli.example.com");
        assert_eq!(resolved.origin_source, OriginSource::Override);
    }

    #[test]
    fn test_rejects_origin_without_scheme() {
        let dir = TempDir::new().unwrap();
        let err = service(&dir)
            .with_origin_override(Some("example.com".to_string()))
            .resolve()
            .unwrap_err();
        assert!(matches!(err, DocsageError::Config(_)));
    }

    #[test]
    fn test_insecure_remote_detection() {
        let dir = TempDir::new().unwrap();
        let resolved = service(&dir)
            .with_origin_override(Some("http://docs.example.com".to_string()))
            .resolve()
            .unwrap();
        assert!(resolved.is_insecure_remote());
    }
}
