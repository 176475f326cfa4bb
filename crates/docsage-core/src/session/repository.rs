//! Durable client storage trait.

use async_trait::async_trait;

use crate::error::Result;

/// Client-local durable key/value storage.
///
/// This is the only persisted client state. Implementations must survive
/// process restarts (file backed) unless they are explicitly ephemeral.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removes a key. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
