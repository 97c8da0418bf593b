//! Blob storage for backups.
//!
//! The sync engine only needs `upload(path, content)`. [`FileStorage`] writes
//! blobs below a local directory; [`MemoryStorage`] keeps them in memory.

use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Top-level namespace for help-center backups.
pub const BACKUP_NAMESPACE: &str = "zendesk";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid blob path: {0}")]
    InvalidPath(String),
}

/// Destination for serialized backups.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    async fn upload(&self, path: &str, content: &str) -> Result<(), StorageError>;
}

/// Storage path of a backup taken at `taken_at`.
///
/// `<namespace>/<subdomain>/article_backups/<YYYYMMDDHHMMSS>[_with_sideload].json`
pub fn backup_path(
    namespace: &str,
    subdomain: &str,
    taken_at: DateTime<Utc>,
    sideload: bool,
) -> String {
    let suffix = if sideload { "_with_sideload" } else { "" };
    format!(
        "{}/{}/article_backups/{}{}.json",
        namespace,
        subdomain,
        taken_at.format("%Y%m%d%H%M%S"),
        suffix
    )
}

/// Writes blobs as files below a root directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a blob path below the root, rejecting absolute paths and `..`.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let is_plain = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStorage for FileStorage {
    async fn upload(&self, path: &str, content: &str) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        let io_err = |source| StorageError::Io {
            path: target.display().to_string(),
            source,
        };

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&target, content).await.map_err(io_err)?;

        tracing::debug!(path = %target.display(), bytes = content.len(), "Wrote blob");
        Ok(())
    }
}

/// Keeps uploaded blobs in memory, in upload order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: Arc<Mutex<Vec<(String, String)>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploaded `(path, content)` pairs.
    pub fn blobs(&self) -> Vec<(String, String)> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl BlobStorage for MemoryStorage {
    async fn upload(&self, path: &str, content: &str) -> Result<(), StorageError> {
        let mut blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        blobs.push((path.to_string(), content.to_string()));
        Ok(())
    }
}
