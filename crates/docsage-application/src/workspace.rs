//! Workspace state machine.
//!
//! Owns the document list and the two independent status tracks (upload and
//! summarize). Network calls are made without holding the state lock, so
//! selection changes stay responsive while an upload or summarization is in
//! flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use docsage_core::config::ClientConfig;
use docsage_core::document::{Document, UploadFile, validate_upload_batch};
use docsage_core::error::{DocsageError, Result};
use docsage_core::status::{SummaryStatus, UploadStatus};
use docsage_core::transport::{DocumentService, SummaryResult, UploadResult};
use serde::Serialize;
use tokio::sync::{RwLock, broadcast, watch};

use crate::events::WorkspaceEvent;

const EVENT_CAPACITY: usize = 64;

/// Point-in-time copy of the workspace, handed to presentation code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkspaceSnapshot {
    pub documents: Vec<Document>,
    pub upload_status: UploadStatus,
    pub upload_error: Option<String>,
    /// Results of the most recent successful batch.
    pub last_upload: Vec<UploadResult>,
    pub summary_status: SummaryStatus,
    pub summary: Option<SummaryResult>,
    pub summary_error: Option<String>,
    /// Set once any upload batch has succeeded in this workspace.
    pub has_uploaded: bool,
}

impl WorkspaceSnapshot {
    pub fn selected_documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(|doc| doc.selected)
    }

    pub fn selected_count(&self) -> usize {
        self.selected_documents().count()
    }

    pub fn all_selected(&self) -> bool {
        !self.documents.is_empty() && self.documents.iter().all(|doc| doc.selected)
    }

    /// Chat is available only after a successful summary and while at least
    /// one document is selected.
    pub fn chat_enabled(&self) -> bool {
        self.summary_status == SummaryStatus::Succeeded && self.selected_count() > 0
    }
}

/// Signal returned by [`Workspace::upload`] once a batch has been accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCompletion {
    /// Documents appended by this batch, in backend response order.
    pub documents: Vec<Document>,
    pub results: Vec<UploadResult>,
}

impl UploadCompletion {
    pub fn total_pages(&self) -> u32 {
        self.results.iter().map(|r| r.page_count).sum()
    }
}

/// The upload → summarize → chat sequencer for one session.
///
/// Cloning is cheap and every clone drives the same state.
#[derive(Clone)]
pub struct Workspace {
    service: Arc<dyn DocumentService>,
    config: ClientConfig,
    state: Arc<RwLock<WorkspaceSnapshot>>,
    events: broadcast::Sender<WorkspaceEvent>,
    chat_availability: Arc<watch::Sender<bool>>,
    /// Bumped under the state lock by every summarization request.
    summary_generation: Arc<AtomicU64>,
}

impl Workspace {
    pub fn new(service: Arc<dyn DocumentService>, config: ClientConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (chat_availability, _) = watch::channel(false);
        Self {
            service,
            config,
            state: Arc::new(RwLock::new(WorkspaceSnapshot::default())),
            events,
            chat_availability: Arc::new(chat_availability),
            summary_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn snapshot(&self) -> WorkspaceSnapshot {
        self.state.read().await.clone()
    }

    pub async fn documents(&self) -> Vec<Document> {
        self.state.read().await.documents.clone()
    }

    pub async fn upload_status(&self) -> UploadStatus {
        self.state.read().await.upload_status
    }

    pub async fn summary_status(&self) -> SummaryStatus {
        self.state.read().await.summary_status
    }

    pub async fn chat_enabled(&self) -> bool {
        self.state.read().await.chat_enabled()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkspaceEvent> {
        self.events.subscribe()
    }

    /// Receiver that always holds the current chat availability.
    pub fn chat_availability(&self) -> watch::Receiver<bool> {
        self.chat_availability.subscribe()
    }

    fn emit(&self, event: WorkspaceEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn publish_availability(&self, state: &WorkspaceSnapshot) {
        let enabled = state.chat_enabled();
        self.chat_availability.send_if_modified(|current| {
            if *current == enabled {
                false
            } else {
                tracing::debug!("[Workspace] Chat availability changed: {}", enabled);
                *current = enabled;
                true
            }
        });
    }

    // ============================================================================
    // Upload
    // ============================================================================

    /// Validates and uploads one batch.
    ///
    /// The batch is rejected as a whole on the first invalid file. On success
    /// one selected document is appended per backend result and an
    /// [`UploadCompletion`] is returned; summarization is left to the caller.
    pub async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadCompletion> {
        if self.upload_status().await == UploadStatus::Uploading {
            return Err(DocsageError::validation("An upload is already in progress"));
        }
        if let Err(e) = validate_upload_batch(&files) {
            self.fail_upload(&e).await;
            return Err(e);
        }

        {
            let mut state = self.state.write().await;
            if state.upload_status == UploadStatus::Uploading {
                return Err(DocsageError::validation("An upload is already in progress"));
            }
            state.upload_status = UploadStatus::Uploading;
            state.upload_error = None;
        }
        tracing::info!("[Workspace] Uploading {} file(s)", files.len());
        self.emit(WorkspaceEvent::UploadStarted { files: files.len() });

        let results = match self.service.upload(&files).await {
            Ok(results) => results,
            Err(e) => {
                self.fail_upload(&e).await;
                return Err(e);
            }
        };

        if results.len() != files.len() {
            tracing::warn!(
                "[Workspace] Backend reported {} result(s) for {} file(s)",
                results.len(),
                files.len()
            );
        }

        let documents: Vec<Document> = results.iter().map(Document::from_upload).collect();
        {
            let mut state = self.state.write().await;
            state.documents.extend(documents.iter().cloned());
            state.upload_status = UploadStatus::Succeeded;
            state.last_upload = results.clone();
            state.has_uploaded = true;
            self.publish_availability(&state);
        }

        tracing::info!("[Workspace] Upload succeeded: {} document(s)", documents.len());
        self.emit(WorkspaceEvent::UploadCompleted {
            documents: documents.clone(),
        });

        Ok(UploadCompletion { documents, results })
    }

    async fn fail_upload(&self, error: &DocsageError) {
        let message = error.to_string();
        {
            let mut state = self.state.write().await;
            state.upload_status = UploadStatus::Failed;
            state.upload_error = Some(message.clone());
        }
        tracing::warn!("[Workspace] Upload failed: {}", message);
        self.emit(WorkspaceEvent::UploadFailed { message });
    }

    /// Returns a finished upload track to idle so another batch can be sent.
    pub async fn acknowledge_upload(&self) {
        let mut state = self.state.write().await;
        if matches!(
            state.upload_status,
            UploadStatus::Succeeded | UploadStatus::Failed
        ) {
            state.upload_status = UploadStatus::Idle;
            state.upload_error = None;
            state.last_upload.clear();
        }
    }

    // ============================================================================
    // Summarize
    // ============================================================================

    /// Summarizes everything the backend holds for the session.
    ///
    /// Refused until at least one upload has succeeded. Failures are recorded
    /// in the workspace and also returned. When a newer summarization starts
    /// before this one finishes, this result is returned but not recorded.
    pub async fn summarize(&self) -> Result<SummaryResult> {
        let generation = {
            let mut state = self.state.write().await;
            if !state.has_uploaded {
                return Err(DocsageError::validation("No documents uploaded"));
            }
            state.summary_status = SummaryStatus::Loading;
            state.summary_error = None;
            self.publish_availability(&state);
            self.summary_generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        tracing::info!("[Workspace] Summarizing session documents");
        self.emit(WorkspaceEvent::SummarizeStarted);

        let outcome = self.service.summarize().await;

        let mut state = self.state.write().await;
        if self.summary_generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("[Workspace] Dropping superseded summary response");
            return outcome;
        }

        match outcome {
            Ok(summary) => {
                state.summary_status = SummaryStatus::Succeeded;
                state.summary = Some(summary.clone());
                self.publish_availability(&state);
                drop(state);

                tracing::info!("[Workspace] Summary ready");
                self.emit(WorkspaceEvent::SummarizeCompleted);
                Ok(summary)
            }
            Err(e) => {
                let message = e.to_string();
                state.summary_status = SummaryStatus::Failed;
                state.summary = None;
                state.summary_error = Some(message.clone());
                self.publish_availability(&state);
                drop(state);

                tracing::warn!("[Workspace] Summarization failed: {}", message);
                self.emit(WorkspaceEvent::SummarizeFailed { message });
                Err(e)
            }
        }
    }

    /// Uploads a batch and, reacting to its completion, summarizes.
    ///
    /// Every successful batch triggers a fresh summary. Only upload failures
    /// are returned; a failed summarization is recorded in the workspace and
    /// leaves chat disabled.
    pub async fn upload_and_summarize(&self, files: Vec<UploadFile>) -> Result<UploadCompletion> {
        let completion = self.upload(files).await?;

        if let Err(e) = self.summarize().await {
            tracing::debug!("[Workspace] Summary after upload did not complete: {}", e);
        }

        Ok(completion)
    }

    // ============================================================================
    // Selection
    // ============================================================================

    async fn mutate_selection<F, T>(&self, mutate: F) -> T
    where
        F: FnOnce(&mut WorkspaceSnapshot) -> T,
    {
        let (output, selected) = {
            let mut state = self.state.write().await;
            let output = mutate(&mut *state);
            self.publish_availability(&state);
            (output, state.selected_count())
        };
        self.emit(WorkspaceEvent::SelectionChanged { selected });
        output
    }

    /// Flips one document's selection. Returns false for an unknown id.
    pub async fn toggle_document(&self, id: &str) -> bool {
        self.mutate_selection(|state| {
            match state.documents.iter_mut().find(|doc| doc.id == id) {
                Some(doc) => {
                    doc.selected = !doc.selected;
                    true
                }
                None => false,
            }
        })
        .await
    }

    pub async fn select_all(&self) {
        self.mutate_selection(|state| {
            state.documents.iter_mut().for_each(|doc| doc.selected = true);
        })
        .await
    }

    pub async fn deselect_all(&self) {
        self.mutate_selection(|state| {
            state.documents.iter_mut().for_each(|doc| doc.selected = false);
        })
        .await
    }

    /// Deselects everything when all documents are selected, otherwise
    /// selects everything.
    pub async fn toggle_all(&self) {
        self.mutate_selection(|state| {
            let select = !state.all_selected();
            state.documents.iter_mut().for_each(|doc| doc.selected = select);
        })
        .await
    }

    /// Drops a document from the local list. The backend keeps its copy and
    /// neither status track changes.
    pub async fn remove_document(&self, id: &str) -> Option<Document> {
        self.mutate_selection(|state| {
            let index = state.documents.iter().position(|doc| doc.id == id)?;
            Some(state.documents.remove(index))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedDocumentService;
    use docsage_core::error::Operation;

    fn workspace(service: &Arc<ScriptedDocumentService>) -> Workspace {
        Workspace::new(service.clone(), ClientConfig::default())
    }

    fn pdfs(names: &[&str]) -> Vec<UploadFile> {
        names
            .iter()
            .map(|name| UploadFile::pdf(*name, b"%PDF-1.7".to_vec()))
            .collect()
    }

    #[tokio::test]
    async fn test_invalid_batch_never_reaches_backend() {
        let service = Arc::new(ScriptedDocumentService::new());
        let ws = workspace(&service);

        let mut files = pdfs(&["a.pdf"]);
        files.push(UploadFile::new("notes.docx", "application/msword", vec![1]));
        let err = ws.upload(files).await.unwrap_err();

        assert!(err.is_validation());
        let snapshot = ws.snapshot().await;
        assert_eq!(snapshot.upload_status, UploadStatus::Failed);
        assert_eq!(
            snapshot.upload_error.as_deref(),
            Some("Invalid file type: notes.docx. Only PDF files are allowed.")
        );
        assert!(snapshot.documents.is_empty());
        assert_eq!(service.upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_appends_selected_documents_in_response_order() {
        let service = Arc::new(ScriptedDocumentService::new());
        let ws = workspace(&service);

        let completion = ws.upload(pdfs(&["b.pdf", "a.pdf"])).await.unwrap();
        assert_eq!(completion.documents.len(), 2);
        assert_eq!(completion.total_pages(), 2 * ScriptedDocumentService::PAGES_PER_FILE);

        let snapshot = ws.snapshot().await;
        assert_eq!(snapshot.upload_status, UploadStatus::Succeeded);
        assert_eq!(snapshot.summary_status, SummaryStatus::Idle);
        assert!(snapshot.documents.iter().all(|d| d.selected));
        assert_eq!(snapshot.documents[0].filename, "b.pdf");
        assert!(snapshot.has_uploaded);
    }

    #[tokio::test]
    async fn test_upload_failure_is_recorded() {
        let service = Arc::new(ScriptedDocumentService::new());
        service.fail_upload_with(DocsageError::http(Operation::Upload, 413, "too big"));
        let ws = workspace(&service);

        let err = ws.upload(pdfs(&["a.pdf"])).await.unwrap_err();
        assert_eq!(err.status(), Some(413));

        let snapshot = ws.snapshot().await;
        assert_eq!(snapshot.upload_status, UploadStatus::Failed);
        assert_eq!(snapshot.upload_error.as_deref(), Some("Upload failed (413): too big"));
        assert!(!snapshot.has_uploaded);
    }

    #[tokio::test]
    async fn test_summarize_refused_before_any_upload() {
        let service = Arc::new(ScriptedDocumentService::new());
        let ws = workspace(&service);

        assert!(ws.summarize().await.unwrap_err().is_validation());
        assert_eq!(ws.summary_status().await, SummaryStatus::Idle);
        assert_eq!(service.summarize_calls(), 0);
    }

    #[tokio::test]
    async fn test_pipeline_enables_chat() {
        let service = Arc::new(ScriptedDocumentService::new());
        let ws = workspace(&service);
        let availability = ws.chat_availability();

        ws.upload_and_summarize(pdfs(&["a.pdf", "b.pdf"])).await.unwrap();

        assert_eq!(ws.summary_status().await, SummaryStatus::Succeeded);
        assert!(ws.chat_enabled().await);
        assert!(*availability.borrow());
        assert_eq!(service.summarize_calls(), 1);
    }

    #[tokio::test]
    async fn test_summarize_failure_keeps_chat_disabled() {
        let service = Arc::new(ScriptedDocumentService::new());
        service.fail_summarize_with(DocsageError::http(Operation::Summarize, 400, "No documents"));
        let ws = workspace(&service);

        let completion = ws.upload_and_summarize(pdfs(&["a.pdf"])).await;
        assert!(completion.is_ok());

        let snapshot = ws.snapshot().await;
        assert_eq!(snapshot.upload_status, UploadStatus::Succeeded);
        assert_eq!(snapshot.summary_status, SummaryStatus::Failed);
        assert_eq!(
            snapshot.summary_error.as_deref(),
            Some("Summarization failed (400): No documents")
        );
        assert!(!snapshot.chat_enabled());
    }

    #[tokio::test]
    async fn test_every_batch_is_summarized() {
        let service = Arc::new(ScriptedDocumentService::new());
        let ws = workspace(&service);

        ws.upload_and_summarize(pdfs(&["a.pdf"])).await.unwrap();
        ws.upload_and_summarize(pdfs(&["b.pdf"])).await.unwrap();

        assert_eq!(service.summarize_calls(), 2);
        let summary = ws.snapshot().await.summary.unwrap();
        assert_eq!(summary.summary, "Summary of 2 uploaded file(s)");
    }

    /// Backend whose first summarization is held until released and then
    /// fails; later ones succeed at once.
    struct SlowFirstSummary {
        inner: ScriptedDocumentService,
        calls: AtomicU64,
        first_entered: tokio::sync::Notify,
        release_first: tokio::sync::Notify,
    }

    #[async_trait::async_trait]
    impl DocumentService for SlowFirstSummary {
        async fn upload(&self, files: &[UploadFile]) -> Result<Vec<UploadResult>> {
            self.inner.upload(files).await
        }

        async fn summarize(&self) -> Result<SummaryResult> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.first_entered.notify_one();
                self.release_first.notified().await;
                return Err(DocsageError::http(Operation::Summarize, 500, "stale"));
            }
            self.inner.summarize().await
        }

        async fn ask(&self, question: &str) -> Result<docsage_core::transport::AskResult> {
            self.inner.ask(question).await
        }
    }

    #[tokio::test]
    async fn test_superseded_summary_is_dropped() {
        let service = Arc::new(SlowFirstSummary {
            inner: ScriptedDocumentService::new(),
            calls: AtomicU64::new(0),
            first_entered: tokio::sync::Notify::new(),
            release_first: tokio::sync::Notify::new(),
        });
        let ws = Workspace::new(service.clone(), ClientConfig::default());
        let mut events = ws.subscribe();

        let first = tokio::spawn({
            let ws = ws.clone();
            async move { ws.upload_and_summarize(pdfs(&["a.pdf"])).await }
        });
        service.first_entered.notified().await;
        assert_eq!(ws.summary_status().await, SummaryStatus::Loading);

        ws.upload_and_summarize(pdfs(&["b.pdf"])).await.unwrap();
        assert_eq!(ws.summary_status().await, SummaryStatus::Succeeded);
        assert!(ws.chat_enabled().await);

        service.release_first.notify_one();
        first.await.unwrap().unwrap();

        let snapshot = ws.snapshot().await;
        assert_eq!(snapshot.summary_status, SummaryStatus::Succeeded);
        assert!(snapshot.summary.is_some());
        assert!(snapshot.summary_error.is_none());
        assert!(snapshot.chat_enabled());
        assert!(*ws.chat_availability().borrow());

        while let Ok(event) = events.try_recv() {
            assert!(!matches!(event, WorkspaceEvent::SummarizeFailed { .. }));
        }
    }

    #[tokio::test]
    async fn test_selection_mutations() {
        let service = Arc::new(ScriptedDocumentService::new());
        let ws = workspace(&service);
        ws.upload_and_summarize(pdfs(&["a.pdf", "b.pdf", "c.pdf"]))
            .await
            .unwrap();
        let ids: Vec<String> = ws.documents().await.into_iter().map(|d| d.id).collect();

        assert!(ws.toggle_document(&ids[1]).await);
        assert!(!ws.toggle_document("missing").await);
        assert_eq!(ws.snapshot().await.selected_count(), 2);

        ws.toggle_all().await;
        assert_eq!(ws.snapshot().await.selected_count(), 3);
        ws.toggle_all().await;
        assert_eq!(ws.snapshot().await.selected_count(), 0);
        assert!(!ws.chat_enabled().await);
        assert_eq!(ws.summary_status().await, SummaryStatus::Succeeded);

        ws.select_all().await;
        assert!(ws.chat_enabled().await);

        let removed = ws.remove_document(&ids[0]).await.unwrap();
        assert_eq!(removed.filename, "a.pdf");
        assert!(ws.remove_document(&ids[0]).await.is_none());
        assert_eq!(ws.documents().await.len(), 2);
    }

    #[tokio::test]
    async fn test_removing_every_document_keeps_status() {
        let service = Arc::new(ScriptedDocumentService::new());
        let ws = workspace(&service);
        ws.upload_and_summarize(pdfs(&["a.pdf"])).await.unwrap();

        let id = ws.documents().await[0].id.clone();
        ws.remove_document(&id).await;

        let snapshot = ws.snapshot().await;
        assert!(snapshot.documents.is_empty());
        assert_eq!(snapshot.upload_status, UploadStatus::Succeeded);
        assert_eq!(snapshot.summary_status, SummaryStatus::Succeeded);
        assert!(!snapshot.chat_enabled());
    }

    #[tokio::test]
    async fn test_acknowledge_upload_returns_to_idle() {
        let service = Arc::new(ScriptedDocumentService::new());
        let ws = workspace(&service);

        ws.acknowledge_upload().await;
        assert_eq!(ws.upload_status().await, UploadStatus::Idle);

        let _ = ws.upload(Vec::new()).await;
        assert_eq!(ws.upload_status().await, UploadStatus::Failed);
        ws.acknowledge_upload().await;
        let snapshot = ws.snapshot().await;
        assert_eq!(snapshot.upload_status, UploadStatus::Idle);
        assert!(snapshot.upload_error.is_none());
    }

    #[tokio::test]
    async fn test_events_follow_pipeline() {
        let service = Arc::new(ScriptedDocumentService::new());
        let ws = workspace(&service);
        let mut events = ws.subscribe();

        ws.upload_and_summarize(pdfs(&["a.pdf"])).await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            WorkspaceEvent::UploadStarted { files: 1 }
        );
        assert!(matches!(
            events.recv().await.unwrap(),
            WorkspaceEvent::UploadCompleted { documents } if documents.len() == 1
        ));
        assert_eq!(events.recv().await.unwrap(), WorkspaceEvent::SummarizeStarted);
        assert_eq!(events.recv().await.unwrap(), WorkspaceEvent::SummarizeCompleted);
    }
}
