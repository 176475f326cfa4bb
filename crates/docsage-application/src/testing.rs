//! In-memory [`DocumentService`] for tests and offline demos.
//!
//! Responses are scripted up front. Every call is counted, questions are
//! recorded, and calls can be held at a gate to observe in-flight states.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use docsage_core::chat::Citation;
use docsage_core::document::UploadFile;
use docsage_core::error::{DocsageError, Result};
use docsage_core::transport::{AskResult, DocumentService, SummaryResult, UploadResult};
use tokio::sync::{Notify, watch};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct ScriptedDocumentService {
    upload_error: Mutex<Option<DocsageError>>,
    summarize_error: Mutex<Option<DocsageError>>,
    ask_error: Mutex<Option<DocsageError>>,
    upload_results: Mutex<Option<Vec<UploadResult>>>,
    answer: Mutex<AskResult>,
    questions: Mutex<Vec<String>>,
    uploaded_files: AtomicUsize,
    upload_calls: AtomicUsize,
    summarize_calls: AtomicUsize,
    ask_calls: AtomicUsize,
    gate: watch::Sender<bool>,
    entered: Notify,
}

impl Default for ScriptedDocumentService {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedDocumentService {
    /// Page count reported for every uploaded file unless results are scripted.
    pub const PAGES_PER_FILE: u32 = 4;

    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            upload_error: Mutex::new(None),
            summarize_error: Mutex::new(None),
            ask_error: Mutex::new(None),
            upload_results: Mutex::new(None),
            answer: Mutex::new(AskResult {
                answer: "Scripted answer".to_string(),
                citations: Some(vec![Citation {
                    source_file: "source.pdf".to_string(),
                    page_number: 1,
                    text: None,
                }]),
                chunk_count: Some(1),
            }),
            questions: Mutex::new(Vec::new()),
            uploaded_files: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            summarize_calls: AtomicUsize::new(0),
            ask_calls: AtomicUsize::new(0),
            gate,
            entered: Notify::new(),
        }
    }

    pub fn fail_upload_with(&self, error: DocsageError) {
        *lock(&self.upload_error) = Some(error);
    }

    pub fn fail_summarize_with(&self, error: DocsageError) {
        *lock(&self.summarize_error) = Some(error);
    }

    pub fn fail_ask_with(&self, error: DocsageError) {
        *lock(&self.ask_error) = Some(error);
    }

    /// Clears every scripted failure.
    pub fn recover(&self) {
        *lock(&self.upload_error) = None;
        *lock(&self.summarize_error) = None;
        *lock(&self.ask_error) = None;
    }

    /// Replaces the echoed upload results with a fixed response.
    pub fn respond_to_upload_with(&self, results: Vec<UploadResult>) {
        *lock(&self.upload_results) = Some(results);
    }

    pub fn answer_with(&self, answer: AskResult) {
        *lock(&self.answer) = answer;
    }

    /// Holds every subsequent call until [`open_gate`](Self::open_gate).
    pub fn close_gate(&self) {
        self.gate.send_replace(false);
    }

    pub fn open_gate(&self) {
        self.gate.send_replace(true);
    }

    /// Resolves once a call is being held at the closed gate.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn summarize_calls(&self) -> usize {
        self.summarize_calls.load(Ordering::SeqCst)
    }

    pub fn ask_calls(&self) -> usize {
        self.ask_calls.load(Ordering::SeqCst)
    }

    pub fn questions(&self) -> Vec<String> {
        lock(&self.questions).clone()
    }

    async fn pass_gate(&self) {
        let mut gate = self.gate.subscribe();
        if !*gate.borrow_and_update() {
            self.entered.notify_one();
        }
        // The sender lives as long as self, so this only ends when opened
        let _ = gate.wait_for(|open| *open).await;
    }
}

#[async_trait]
impl DocumentService for ScriptedDocumentService {
    async fn upload(&self, files: &[UploadFile]) -> Result<Vec<UploadResult>> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;

        if let Some(error) = lock(&self.upload_error).clone() {
            return Err(error);
        }

        let results = lock(&self.upload_results).clone().unwrap_or_else(|| {
            files
                .iter()
                .map(|file| UploadResult {
                    filename: file.name.clone(),
                    session_id: None,
                    page_count: Self::PAGES_PER_FILE,
                })
                .collect()
        });
        self.uploaded_files.fetch_add(results.len(), Ordering::SeqCst);
        Ok(results)
    }

    async fn summarize(&self) -> Result<SummaryResult> {
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;

        if let Some(error) = lock(&self.summarize_error).clone() {
            return Err(error);
        }

        let count = self.uploaded_files.load(Ordering::SeqCst);
        Ok(SummaryResult {
            summary: format!("Summary of {} uploaded file(s)", count),
            citations: None,
            document_count: Some(count as u32),
        })
    }

    async fn ask(&self, question: &str) -> Result<AskResult> {
        self.ask_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.questions).push(question.to_string());
        self.pass_gate().await;

        if let Some(error) = lock(&self.ask_error).clone() {
            return Err(error);
        }
        Ok(lock(&self.answer).clone())
    }
}
