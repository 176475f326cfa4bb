//! Durable session identity: get-or-create, metadata and clearing.

use std::sync::Arc;

use super::model::{SESSION_CREATED_AT_KEY, SESSION_ID_KEY, SessionContext, SessionId, SessionInfo};
use super::repository::KeyValueStore;
use crate::error::Result;

/// Owns the durable per-client session identifier.
///
/// `SessionIdentityStore` is responsible for:
/// - Returning the persisted identifier, generating and persisting one on first use
/// - Reporting session metadata (identifier and creation time)
/// - Clearing both persisted keys when the workspace is abandoned
///
/// Storage failures never bubble out of [`get_or_create_session_id`]: an
/// empty identifier is returned instead and callers treat it as "not yet
/// available".
///
/// [`get_or_create_session_id`]: SessionIdentityStore::get_or_create_session_id
#[derive(Clone)]
pub struct SessionIdentityStore {
    store: Option<Arc<dyn KeyValueStore>>,
}

impl SessionIdentityStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A store with no durable backing. Every identifier it returns is empty.
    pub fn unavailable() -> Self {
        Self { store: None }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// Returns the persisted identifier, creating and persisting a fresh one
    /// (with its creation timestamp) when none exists.
    pub async fn get_or_create_session_id(&self) -> SessionId {
        let Some(store) = &self.store else {
            tracing::debug!("[SessionStore] Durable storage unavailable, returning empty id");
            return SessionId::empty();
        };

        match Self::load_or_create(store.as_ref()).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("[SessionStore] Failed to access session storage: {}", e);
                SessionId::empty()
            }
        }
    }

    async fn load_or_create(store: &dyn KeyValueStore) -> Result<SessionId> {
        if let Some(existing) = store.get(SESSION_ID_KEY).await?
            && !existing.trim().is_empty()
        {
            return Ok(SessionId::from(existing));
        }

        // The id is written last so it is never persisted without its timestamp
        let session_id = SessionId::generate();
        store
            .set(SESSION_CREATED_AT_KEY, chrono::Utc::now().to_rfc3339())
            .await?;
        store
            .set(SESSION_ID_KEY, session_id.as_str().to_string())
            .await?;

        tracing::info!("[SessionStore] Created new session: {}", session_id);
        Ok(session_id)
    }

    /// Returns the identifier together with its creation timestamp.
    pub async fn session_info(&self) -> SessionInfo {
        let session_id = self.get_or_create_session_id().await;
        let created_at = match &self.store {
            Some(store) if !session_id.is_empty() => {
                store.get(SESSION_CREATED_AT_KEY).await.ok().flatten()
            }
            _ => None,
        };

        SessionInfo {
            session_id,
            created_at,
        }
    }

    /// Builds the context injected into the transport and the workspace.
    pub async fn context(&self) -> SessionContext {
        let info = self.session_info().await;
        SessionContext::new(info.session_id, info.created_at)
    }

    /// Removes both persisted keys without rebuilding any client state.
    ///
    /// The next call to [`get_or_create_session_id`] generates a new identifier.
    ///
    /// [`get_or_create_session_id`]: SessionIdentityStore::get_or_create_session_id
    pub async fn clear_session(&self) -> Result<()> {
        if let Some(store) = &self.store {
            store.remove(SESSION_ID_KEY).await?;
            store.remove(SESSION_CREATED_AT_KEY).await?;
            tracing::info!("[SessionStore] Session cleared");
        }
        Ok(())
    }
}
