//! Content-addressed rendition store.
//!
//! Entries are write-once, read-many files at
//! `store-root/{label}/{fingerprint}.{extension}`. Publication is atomic
//! (write to a temporary file in the destination directory, then rename),
//! so a concurrent existence check never observes a truncated entry. There
//! is no eviction: entries live until an explicit [`RenditionStore::clear`].

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use thiserror::Error;
use tokio::fs;

use aquamark_core::EngineError;

use crate::keys::RenditionKey;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Rendition not found: {0}")]
    NotFound(String),

    #[error("Invalid rendition key: {0}")]
    InvalidKey(String),

    #[error("Publish failed: {0}")]
    PublishFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        EngineError::Store(err.to_string())
    }
}

/// Filesystem-backed content-addressed store, one directory per variant
/// label under a single root.
#[derive(Clone)]
pub struct RenditionStore {
    root: PathBuf,
    labels: Vec<String>,
}

impl RenditionStore {
    /// Open (or initialize) a store rooted at `root`, creating the
    /// per-label directory layout before first use.
    pub async fn open_at(root: impl Into<PathBuf>, labels: &[String]) -> StoreResult<Self> {
        if labels.is_empty() {
            return Err(StoreError::ConfigError(
                "store requires at least one variant label".to_string(),
            ));
        }
        let store = RenditionStore {
            root: root.into(),
            labels: labels.to_vec(),
        };
        store.ensure_layout().await?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn ensure_layout(&self) -> StoreResult<()> {
        for label in &self.labels {
            let dir = self.root.join(label);
            fs::create_dir_all(&dir).await.map_err(|e| {
                StoreError::ConfigError(format!(
                    "Failed to create store directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Absolute path an entry lives at (whether or not it exists yet).
    pub fn path_for(&self, key: &RenditionKey) -> PathBuf {
        self.root.join(key.label()).join(key.filename())
    }

    /// Direct path-existence query. Never a directory listing: an atomic
    /// publish guarantees any path that exists is a complete entry.
    pub async fn exists(&self, key: &RenditionKey) -> bool {
        fs::try_exists(self.path_for(key)).await.unwrap_or(false)
    }

    /// Open an entry for reading.
    pub async fn open(&self, key: &RenditionKey) -> StoreResult<fs::File> {
        let path = self.path_for(key);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StoreError::NotFound(key.to_string()));
        }
        Ok(fs::File::open(&path).await?)
    }

    /// Read an entry fully into memory.
    pub async fn read(&self, key: &RenditionKey) -> StoreResult<Vec<u8>> {
        let path = self.path_for(key);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StoreError::NotFound(key.to_string()));
        }
        Ok(fs::read(&path).await?)
    }

    /// Stream an entry without buffering it, for serving large renditions.
    pub async fn open_stream(
        &self,
        key: &RenditionKey,
    ) -> StoreResult<Pin<Box<dyn Stream<Item = Result<Bytes, StoreError>> + Send>>> {
        let file = self.open(key).await?;
        let stream = tokio_util::io::ReaderStream::new(file).map(|chunk| chunk.map_err(StoreError::from));
        Ok(Box::pin(stream))
    }

    /// Publish a completed transformation result under its canonical key.
    ///
    /// Idempotent: once existence is confirmed a second publish is skipped.
    /// The source file is copied to a temporary name in the destination
    /// directory and renamed into place, so readers only ever see whole
    /// entries. Returns the published path.
    pub async fn publish_file(&self, key: &RenditionKey, source: &Path) -> StoreResult<PathBuf> {
        let dest = self.path_for(key);
        if self.exists(key).await {
            tracing::debug!(key = %key, "rendition already published, skipping");
            return Ok(dest);
        }

        let dir = self.root.join(key.label());
        fs::create_dir_all(&dir).await?;

        let start = std::time::Instant::now();
        let tmp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|e| StoreError::PublishFailed(format!("temp file creation: {}", e)))?;
        let size = fs::copy(source, tmp.path()).await.map_err(|e| {
            StoreError::PublishFailed(format!(
                "Failed to copy {} into store: {}",
                source.display(),
                e
            ))
        })?;
        tmp.persist(&dest)
            .map_err(|e| StoreError::PublishFailed(format!("Failed to publish entry: {}", e)))?;

        tracing::info!(
            key = %key,
            path = %dest.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Rendition published"
        );
        Ok(dest)
    }

    /// Publish from an in-memory buffer. Same atomicity and idempotence as
    /// [`RenditionStore::publish_file`].
    pub async fn publish_bytes(&self, key: &RenditionKey, data: Bytes) -> StoreResult<PathBuf> {
        let dest = self.path_for(key);
        if self.exists(key).await {
            tracing::debug!(key = %key, "rendition already published, skipping");
            return Ok(dest);
        }

        let dir = self.root.join(key.label());
        fs::create_dir_all(&dir).await?;

        let tmp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|e| StoreError::PublishFailed(format!("temp file creation: {}", e)))?;
        fs::write(tmp.path(), &data)
            .await
            .map_err(|e| StoreError::PublishFailed(format!("Failed to write entry: {}", e)))?;
        tmp.persist(&dest)
            .map_err(|e| StoreError::PublishFailed(format!("Failed to publish entry: {}", e)))?;

        tracing::info!(
            key = %key,
            path = %dest.display(),
            size_bytes = data.len(),
            "Rendition published"
        );
        Ok(dest)
    }

    /// Remove every entry across all variant labels and recreate the empty
    /// directory layout. Destructive and irreversible; administrative use.
    pub async fn clear(&self) -> StoreResult<()> {
        match fs::remove_dir_all(&self.root).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.ensure_layout().await?;
        tracing::info!(root = %self.root.display(), "Rendition store cleared");
        Ok(())
    }

    /// Total bytes used by the store. Capacity reporting only — the store
    /// itself enforces no bound.
    pub async fn total_size(&self) -> StoreResult<u64> {
        dir_size(self.root.clone()).await
    }
}

fn dir_size(path: PathBuf) -> Pin<Box<dyn Future<Output = StoreResult<u64>> + Send>> {
    Box::pin(async move {
        let mut total = 0u64;
        let mut entries = fs::read_dir(&path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let meta = entry.metadata().await?;
            if meta.is_dir() {
                total += dir_size(entry.path()).await?;
            } else {
                total += meta.len();
            }
        }
        Ok(total)
    })
}
