//! Reading selected files into attachments before a send.

use async_trait::async_trait;
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::models::attachment::Attachment;

/// Where selected files are read from.
#[async_trait]
pub trait FileSource: Send + Sync {
    async fn read(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

/// Files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

#[async_trait]
impl FileSource for LocalFiles {
    async fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read one file fully and encode it.
pub async fn encode_file(source: &dyn FileSource, path: &Path) -> ClientResult<Attachment> {
    let bytes = source
        .read(path)
        .await
        .map_err(|source| ClientError::Attachment {
            path: path.display().to_string(),
            source,
        })?;
    debug!(path = %path.display(), size = bytes.len(), "attachment read");
    Ok(Attachment::from_bytes(file_name(path), &bytes))
}

/// Read every file concurrently. Fails as a whole if any read fails; order follows `paths`.
pub async fn encode_all(source: &dyn FileSource, paths: &[PathBuf]) -> ClientResult<Vec<Attachment>> {
    try_join_all(paths.iter().map(|p| encode_file(source, p))).await
}
