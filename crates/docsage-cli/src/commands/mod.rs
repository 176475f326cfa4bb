pub mod diagnose;
pub mod session;
pub mod upload;

use std::path::PathBuf;

use anyhow::{Context, Result};
use docsage_core::document::UploadFile;

/// Reads every path into an upload batch.
pub async fn load_files(paths: &[PathBuf]) -> Result<Vec<UploadFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = UploadFile::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        files.push(file);
    }
    Ok(files)
}
