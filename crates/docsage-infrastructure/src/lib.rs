//! Infrastructure layer for Docsage: durable storage, paths and configuration.

pub mod config_service;
pub mod paths;
pub mod storage;

pub use crate::config_service::{ConfigService, OriginSource, ResolvedConfig};
pub use crate::paths::DocsagePaths;
pub use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
