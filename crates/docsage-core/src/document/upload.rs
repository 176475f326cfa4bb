//! Files selected for upload and their local validation.

use std::path::Path;

use crate::error::{DocsageError, Result};

/// Declared MIME type every uploaded file must carry.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Per-file size ceiling (50 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// A file the user picked for upload, held in memory until it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Filename
    pub name: String,
    /// Declared MIME type
    pub content_type: String,
    /// Declared size in bytes
    pub size: u64,
    /// File contents
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size: bytes.len() as u64,
            bytes,
        }
    }

    /// Convenience constructor for an in-memory PDF.
    pub fn pdf(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(name, PDF_MIME_TYPE, bytes)
    }

    /// Reads a file from disk, deriving its declared type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| DocsageError::io(format!("Not a file path: {}", path.display())))?;

        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(name, content_type, bytes))
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == PDF_MIME_TYPE
    }
}

/// Validates a batch before any network call.
///
/// The whole batch is rejected on the first offending file; there is no
/// partial upload.
pub fn validate_upload_batch(files: &[UploadFile]) -> Result<()> {
    if files.is_empty() {
        return Err(DocsageError::validation("No files selected"));
    }

    for file in files {
        if !file.is_pdf() {
            return Err(DocsageError::validation(format!(
                "Invalid file type: {}. Only PDF files are allowed.",
                file.name
            )));
        }
        if file.size > MAX_UPLOAD_BYTES {
            return Err(DocsageError::validation(format!(
                "File too large: {}. Maximum size is 50MB.",
                file.name
            )));
        }
    }

    Ok(())
}
