//! Startup wiring: paths, configuration, session store and app.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use docsage_core::session::{KeyValueStore, SessionIdentityStore};
use docsage_infrastructure::{
    ConfigService, DocsagePaths, FileKeyValueStore, MemoryKeyValueStore, ResolvedConfig,
};

use crate::app::DocsageApp;

/// Startup knobs, usually filled from command line flags.
#[derive(Debug, Clone, Default)]
pub struct BootstrapOptions {
    /// Base directory instead of `$DOCSAGE_HOME` / the platform config dir.
    pub home: Option<PathBuf>,
    /// Backend origin taking priority over every other source.
    pub backend_origin: Option<String>,
    /// Keep the session identity in memory only.
    pub ephemeral: bool,
}

pub struct AppBootstrap {
    pub app: DocsageApp,
    pub paths: DocsagePaths,
    pub config: ResolvedConfig,
}

impl AppBootstrap {
    /// Resolves paths and configuration, opens the session store and builds
    /// the application.
    pub async fn run(options: BootstrapOptions) -> Result<Self> {
        let paths = match options.home {
            Some(home) => DocsagePaths::new(home),
            None => DocsagePaths::resolve().context("Failed to resolve docsage directory")?,
        };
        tracing::debug!("[Bootstrap] Using directory {:?}", paths.base_dir());

        let config = ConfigService::new(paths.config_file())
            .with_origin_override(options.backend_origin)
            .resolve()
            .context("Failed to load configuration")?;
        tracing::info!("[Bootstrap] Backend origin: {}", config.describe_origin());

        let store: Arc<dyn KeyValueStore> = if options.ephemeral {
            tracing::info!("[Bootstrap] Using in-memory session storage");
            Arc::new(MemoryKeyValueStore::new())
        } else {
            tokio::fs::create_dir_all(paths.base_dir())
                .await
                .with_context(|| format!("Failed to create {:?}", paths.base_dir()))?;
            Arc::new(FileKeyValueStore::new(paths.session_store_file()))
        };

        let app = DocsageApp::new(SessionIdentityStore::new(store), config.config.clone()).await;

        Ok(Self { app, paths, config })
    }
}
