//! HttpDocumentClient - reqwest implementation of the backend transport.
//!
//! Every request carries the session identifier the client was built with:
//! as a `session_id` query parameter for upload and summarize, and inside the
//! JSON body for chat.

use async_trait::async_trait;
use docsage_core::config::ClientConfig;
use docsage_core::document::UploadFile;
use docsage_core::error::{DocsageError, Operation, Result};
use docsage_core::session::{SessionContext, SessionId};
use docsage_core::transport::{AskResult, DocumentService, SummaryResult, UploadResult};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::wire::{
    CHAT_PATH, ChatRequest, SESSION_QUERY_PARAM, SUMMARIZE_PATH, UPLOAD_FIELD, UPLOAD_PATH,
    UploadResponse,
};

#[derive(Debug, Clone)]
pub struct HttpDocumentClient {
    client: Client,
    origin: String,
    session: SessionContext,
}

impl HttpDocumentClient {
    pub fn new(config: &ClientConfig, session: SessionContext) -> Self {
        Self {
            client: Client::new(),
            origin: config.normalized_origin().to_string(),
            session,
        }
    }

    /// Replaces the underlying reqwest client (proxies, timeouts, ...).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    fn session_id(&self) -> Result<&SessionId> {
        if self.session.is_available() {
            Ok(self.session.session_id())
        } else {
            Err(DocsageError::validation("Session not yet available"))
        }
    }

    async fn send(&self, operation: Operation, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|err| {
            if err.is_connect() || err.is_request() || err.is_timeout() {
                tracing::warn!("[HttpDocumentClient] {} request got no response: {}", operation, err);
                DocsageError::BackendUnreachable
            } else {
                DocsageError::internal(format!("{operation} request failed: {err}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            tracing::warn!(
                "[HttpDocumentClient] {} failed with status {}",
                operation,
                status.as_u16()
            );
            return Err(DocsageError::http(operation, status.as_u16(), body_text));
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(operation: Operation, response: Response) -> Result<T> {
        let text = response.text().await.map_err(|err| {
            DocsageError::internal(format!("Failed to read {operation} response: {err}"))
        })?;
        serde_json::from_str(&text).map_err(|err| DocsageError::Serialization {
            format: "JSON".to_string(),
            message: format!("Failed to parse {operation} response: {err}"),
        })
    }

    fn upload_form(files: &[UploadFile]) -> Result<Form> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(&file.content_type)
                .map_err(|err| {
                    DocsageError::validation(format!(
                        "Invalid content type for {}: {err}",
                        file.name
                    ))
                })?;
            form = form.part(UPLOAD_FIELD, part);
        }
        Ok(form)
    }
}

#[async_trait]
impl DocumentService for HttpDocumentClient {
    async fn upload(&self, files: &[UploadFile]) -> Result<Vec<UploadResult>> {
        let session_id = self.session_id()?;
        let form = Self::upload_form(files)?;

        tracing::debug!(
            "[HttpDocumentClient] Uploading {} file(s) for session {}",
            files.len(),
            session_id
        );

        let request = self
            .client
            .post(self.url(UPLOAD_PATH))
            .query(&[(SESSION_QUERY_PARAM, session_id.as_str())])
            .multipart(form);
        let response = self.send(Operation::Upload, request).await?;
        let parsed: UploadResponse = Self::decode(Operation::Upload, response).await?;
        Ok(parsed.into_results())
    }

    async fn summarize(&self) -> Result<SummaryResult> {
        let session_id = self.session_id()?;
        tracing::debug!("[HttpDocumentClient] Summarizing session {}", session_id);

        let request = self
            .client
            .post(self.url(SUMMARIZE_PATH))
            .query(&[(SESSION_QUERY_PARAM, session_id.as_str())])
            .json(&serde_json::json!({}));
        let response = self.send(Operation::Summarize, request).await?;
        Self::decode(Operation::Summarize, response).await
    }

    async fn ask(&self, question: &str) -> Result<AskResult> {
        let session_id = self.session_id()?;
        tracing::debug!("[HttpDocumentClient] Asking question for session {}", session_id);

        let body = ChatRequest {
            session_id: session_id.as_str(),
            question,
        };
        let request = self.client.post(self.url(CHAT_PATH)).json(&body);
        let response = self.send(Operation::Ask, request).await?;
        Self::decode(Operation::Ask, response).await
    }
}
