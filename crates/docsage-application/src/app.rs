//! The assembled client: session context, transport, workspace and the two
//! chat surfaces.

use std::sync::Arc;

use docsage_core::config::ClientConfig;
use docsage_core::error::Result;
use docsage_core::session::{SessionContext, SessionIdentityStore, SessionInfo};
use docsage_core::transport::DocumentService;
use docsage_interaction::HttpDocumentClient;

use crate::chat_session::{ChatSession, ChatSurface};
use crate::workspace::Workspace;

/// Builds the transport for a given session.
pub type ServiceFactory =
    Arc<dyn Fn(&ClientConfig, &SessionContext) -> Arc<dyn DocumentService> + Send + Sync>;

/// Factory producing the HTTP transport.
pub fn http_service_factory() -> ServiceFactory {
    Arc::new(|config: &ClientConfig, context: &SessionContext| {
        Arc::new(HttpDocumentClient::new(config, context.clone())) as Arc<dyn DocumentService>
    })
}

/// Everything scoped to one session.
///
/// The session context is read once here and injected downward. Ending the
/// session consumes the app and builds a fresh one, so no component ever
/// observes the identifier changing underneath it.
pub struct DocsageApp {
    identity: SessionIdentityStore,
    config: ClientConfig,
    factory: ServiceFactory,
    context: SessionContext,
    workspace: Workspace,
    primary_chat: ChatSession,
    drawer_chat: ChatSession,
}

impl DocsageApp {
    pub async fn new(identity: SessionIdentityStore, config: ClientConfig) -> Self {
        Self::with_service_factory(identity, config, http_service_factory()).await
    }

    pub async fn with_service_factory(
        identity: SessionIdentityStore,
        config: ClientConfig,
        factory: ServiceFactory,
    ) -> Self {
        let context = identity.context().await;
        if context.is_available() {
            tracing::info!("[App] Session {} ready", context.session_id());
        } else {
            tracing::warn!("[App] Session not yet available; backend calls will be refused");
        }

        let service = factory(&config, &context);
        let workspace = Workspace::new(service.clone(), config.clone());
        let primary_chat = ChatSession::new(
            ChatSurface::Primary,
            service.clone(),
            workspace.chat_availability(),
        );
        let drawer_chat =
            ChatSession::new(ChatSurface::Drawer, service, workspace.chat_availability());

        Self {
            identity,
            config,
            factory,
            context,
            workspace,
            primary_chat,
            drawer_chat,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn chat(&self, surface: ChatSurface) -> &ChatSession {
        match surface {
            ChatSurface::Primary => &self.primary_chat,
            ChatSurface::Drawer => &self.drawer_chat,
        }
    }

    pub fn session_info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.context.session_id().clone(),
            created_at: self.context.created_at().map(str::to_string),
        }
    }

    /// Ends the workspace: clears the persisted identity and rebuilds every
    /// component under a newly generated session.
    ///
    /// The backend is not contacted. Results of calls still in flight land in
    /// the discarded components.
    pub async fn reset_session(self) -> Result<Self> {
        tracing::info!("[App] Resetting session {}", self.context.session_id());
        self.identity.clear_session().await?;
        Ok(Self::with_service_factory(self.identity, self.config, self.factory).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedDocumentService;
    use docsage_core::document::UploadFile;
    use docsage_core::session::{KeyValueStore, SESSION_CREATED_AT_KEY, SESSION_ID_KEY};
    use docsage_infrastructure::MemoryKeyValueStore;

    fn scripted_factory(service: Arc<ScriptedDocumentService>) -> ServiceFactory {
        Arc::new(move |_: &ClientConfig, _: &SessionContext| {
            service.clone() as Arc<dyn DocumentService>
        })
    }

    #[tokio::test]
    async fn test_reset_rebuilds_everything() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let service = Arc::new(ScriptedDocumentService::new());
        let app = DocsageApp::with_service_factory(
            SessionIdentityStore::new(store.clone()),
            ClientConfig::default(),
            scripted_factory(service.clone()),
        )
        .await;

        let before = app.context().session_id().clone();
        assert!(!before.is_empty());

        app.workspace()
            .upload_and_summarize(vec![UploadFile::pdf("a.pdf", b"%PDF".to_vec())])
            .await
            .unwrap();
        app.chat(ChatSurface::Primary).send("hi").await;
        assert!(app.workspace().chat_enabled().await);

        let app = app.reset_session().await.unwrap();
        let after = app.context().session_id().clone();

        assert_ne!(before, after);
        assert_eq!(
            store.get(SESSION_ID_KEY).await.unwrap().as_deref(),
            Some(after.as_str())
        );
        assert!(store.get(SESSION_CREATED_AT_KEY).await.unwrap().is_some());
        assert!(app.workspace().documents().await.is_empty());
        assert!(!app.workspace().chat_enabled().await);
        assert!(app.chat(ChatSurface::Primary).transcript().await.is_empty());
        assert!(!app.chat(ChatSurface::Drawer).is_enabled());
    }

    #[tokio::test]
    async fn test_factory_receives_session_context() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let factory: ServiceFactory = {
            let seen = seen.clone();
            Arc::new(move |_: &ClientConfig, context: &SessionContext| {
                seen.lock().unwrap().push(context.session_id().clone());
                Arc::new(ScriptedDocumentService::new()) as Arc<dyn DocumentService>
            })
        };

        let app = DocsageApp::with_service_factory(
            SessionIdentityStore::new(store),
            ClientConfig::default(),
            factory,
        )
        .await;
        assert_eq!(seen.lock().unwrap().as_slice(), &[app.context().session_id().clone()]);
        assert_eq!(app.session_info().session_id, *app.context().session_id());
    }

    #[tokio::test]
    async fn test_unavailable_identity_yields_unavailable_context() {
        let app = DocsageApp::new(SessionIdentityStore::unavailable(), ClientConfig::default()).await;
        assert!(!app.context().is_available());

        let err = app
            .workspace()
            .upload(vec![UploadFile::pdf("a.pdf", b"%PDF".to_vec())])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Session not yet available");
    }
}
