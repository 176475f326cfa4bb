//! End-to-end workspace flows against the scripted backend.

use std::sync::Arc;

use docsage_application::testing::ScriptedDocumentService;
use docsage_application::{
    ChatSurface, DocsageApp, RejectReason, SendOutcome, ServiceFactory, SummaryPanel,
};
use docsage_core::chat::MessageRole;
use docsage_core::config::ClientConfig;
use docsage_core::document::UploadFile;
use docsage_core::error::{DocsageError, Operation};
use docsage_core::session::{SessionContext, SessionIdentityStore};
use docsage_core::status::{SummaryStatus, UploadStatus};
use docsage_core::transport::{DocumentService, UploadResult};
use docsage_infrastructure::MemoryKeyValueStore;

async fn app_with(service: &Arc<ScriptedDocumentService>) -> DocsageApp {
    let service = service.clone();
    let factory: ServiceFactory = Arc::new(move |_: &ClientConfig, _: &SessionContext| {
        service.clone() as Arc<dyn DocumentService>
    });
    DocsageApp::with_service_factory(
        SessionIdentityStore::new(Arc::new(MemoryKeyValueStore::new())),
        ClientConfig::default(),
        factory,
    )
    .await
}

fn pdf(name: &str) -> UploadFile {
    UploadFile::pdf(name, b"%PDF-1.7 test".to_vec())
}

#[tokio::test]
async fn two_pdfs_are_selected_and_summarized() {
    let service = Arc::new(ScriptedDocumentService::new());
    let app = app_with(&service).await;
    let workspace = app.workspace();

    workspace
        .upload_and_summarize(vec![pdf("q3-report.pdf"), pdf("q4-report.pdf")])
        .await
        .unwrap();

    let snapshot = workspace.snapshot().await;
    assert_eq!(snapshot.documents.len(), 2);
    assert!(snapshot.documents.iter().all(|doc| doc.selected));
    assert_eq!(snapshot.upload_status, UploadStatus::Succeeded);
    assert_eq!(snapshot.summary_status, SummaryStatus::Succeeded);
    assert_eq!(service.summarize_calls(), 1);

    match snapshot.summary_panel() {
        SummaryPanel::Ready { headline, .. } => {
            assert_eq!(headline, "Combined summary from 2 documents")
        }
        other => panic!("unexpected panel: {:?}", other),
    }
    assert_eq!(snapshot.selection_header(), "2 of 2 selected");
    assert!(app.chat(ChatSurface::Primary).is_enabled());
    assert!(app.chat(ChatSurface::Drawer).is_enabled());
}

#[tokio::test]
async fn docx_is_rejected_before_any_request() {
    let service = Arc::new(ScriptedDocumentService::new());
    let app = app_with(&service).await;

    let docx = UploadFile::new(
        "contract.docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        vec![0x50, 0x4b],
    );
    let err = app
        .workspace()
        .upload_and_summarize(vec![docx])
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Invalid file type: contract.docx. Only PDF files are allowed."
    );
    let snapshot = app.workspace().snapshot().await;
    assert_eq!(snapshot.upload_status, UploadStatus::Failed);
    assert_eq!(snapshot.summary_status, SummaryStatus::Idle);
    assert_eq!(service.upload_calls(), 0);
    assert_eq!(service.summarize_calls(), 0);
}

#[tokio::test]
async fn ask_after_failed_summary_is_a_noop() {
    let service = Arc::new(ScriptedDocumentService::new());
    service.fail_summarize_with(DocsageError::http(Operation::Summarize, 500, "LLM offline"));
    let app = app_with(&service).await;

    app.workspace()
        .upload_and_summarize(vec![pdf("a.pdf")])
        .await
        .unwrap();
    assert_eq!(app.workspace().summary_status().await, SummaryStatus::Failed);

    let chat = app.chat(ChatSurface::Primary);
    let outcome = chat.send("What does it say?").await;

    assert_eq!(outcome, SendOutcome::Rejected(RejectReason::Disabled));
    assert!(chat.transcript().await.is_empty());
    assert_eq!(service.ask_calls(), 0);
}

#[tokio::test]
async fn chat_server_error_is_rendered_into_transcript() {
    let service = Arc::new(ScriptedDocumentService::new());
    service.fail_ask_with(DocsageError::http(Operation::Ask, 500, "index not ready"));
    let app = app_with(&service).await;

    app.workspace()
        .upload_and_summarize(vec![pdf("a.pdf")])
        .await
        .unwrap();

    let chat = app.chat(ChatSurface::Drawer);
    chat.send("Summarize page 2").await;

    let transcript = chat.transcript().await;
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].role, MessageRole::User);
    assert_eq!(transcript[1].role, MessageRole::Assistant);
    assert!(transcript[1].is_error());
    assert_eq!(
        transcript[1].content,
        "Error: Chat failed (500): index not ready"
    );
    assert!(app.chat(ChatSurface::Primary).transcript().await.is_empty());
}

#[tokio::test]
async fn deselect_all_disables_chat_without_touching_summary() {
    let service = Arc::new(ScriptedDocumentService::new());
    let app = app_with(&service).await;
    app.workspace()
        .upload_and_summarize(vec![pdf("a.pdf"), pdf("b.pdf")])
        .await
        .unwrap();

    app.workspace().deselect_all().await;

    assert_eq!(app.workspace().summary_status().await, SummaryStatus::Succeeded);
    let chat = app.chat(ChatSurface::Primary);
    assert!(!chat.is_enabled());
    assert!(chat.send("anything").await.is_rejected());

    app.workspace().select_all().await;
    assert!(matches!(chat.send("anything").await, SendOutcome::Answered(_)));
}

#[tokio::test]
async fn selection_toggles_while_upload_is_in_flight() {
    let service = Arc::new(ScriptedDocumentService::new());
    let app = app_with(&service).await;
    let workspace = app.workspace().clone();

    workspace.upload(vec![pdf("first.pdf")]).await.unwrap();
    let first_id = workspace.documents().await[0].id.clone();

    service.close_gate();
    let upload = tokio::spawn({
        let workspace = workspace.clone();
        async move { workspace.upload(vec![pdf("second.pdf")]).await }
    });
    service.entered().await;

    assert_eq!(workspace.upload_status().await, UploadStatus::Uploading);
    assert!(workspace.toggle_document(&first_id).await);
    assert_eq!(workspace.snapshot().await.selected_count(), 0);

    service.open_gate();
    upload.await.unwrap().unwrap();

    let snapshot = workspace.snapshot().await;
    assert_eq!(snapshot.documents.len(), 2);
    assert!(!snapshot.documents[0].selected);
    assert!(snapshot.documents[1].selected);
}

#[tokio::test]
async fn documents_follow_backend_response_order() {
    let service = Arc::new(ScriptedDocumentService::new());
    service.respond_to_upload_with(vec![
        UploadResult {
            filename: "b.pdf".to_string(),
            session_id: None,
            page_count: 9,
        },
        UploadResult {
            filename: "a.pdf".to_string(),
            session_id: None,
            page_count: 2,
        },
    ]);
    let app = app_with(&service).await;

    app.workspace()
        .upload(vec![pdf("a.pdf"), pdf("b.pdf")])
        .await
        .unwrap();

    let names: Vec<String> = app
        .workspace()
        .documents()
        .await
        .into_iter()
        .map(|doc| format!("{}:{}", doc.filename, doc.page_count))
        .collect();
    assert_eq!(names, vec!["b.pdf:9", "a.pdf:2"]);
}

#[tokio::test]
async fn reset_abandons_in_flight_upload() {
    let service = Arc::new(ScriptedDocumentService::new());
    let app = app_with(&service).await;
    let old_workspace = app.workspace().clone();
    let old_session = app.context().session_id().clone();

    service.close_gate();
    let upload = tokio::spawn({
        let workspace = old_workspace.clone();
        async move { workspace.upload(vec![pdf("late.pdf")]).await }
    });
    service.entered().await;

    let app = app.reset_session().await.unwrap();
    service.open_gate();
    upload.await.unwrap().unwrap();

    assert_ne!(app.context().session_id(), &old_session);
    assert!(app.workspace().documents().await.is_empty());
    assert_eq!(app.workspace().upload_status().await, UploadStatus::Idle);
}
