//! Transient staging area for uploaded assets.
//!
//! The external transformer operates on file paths, not in-memory streams,
//! so each incoming asset is persisted here first. Staged files use a
//! request-unique UUID name so concurrent requests never collide, and are
//! removed when the owning [`StagedAsset`] guard drops.

use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

/// Staging directory shared by all requests; each staged file within it is
/// request-unique.
#[derive(Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Open (or create) the staging directory.
    pub async fn open_at(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(StagingArea { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist asset bytes under a fresh UUID name. The returned guard
    /// removes the file on drop.
    pub async fn stage(&self, data: &[u8], extension: &str) -> std::io::Result<StagedAsset> {
        let path = self.root.join(format!("{}.{}", Uuid::new_v4(), extension));
        fs::write(&path, data).await?;
        tracing::debug!(path = %path.display(), size_bytes = data.len(), "asset staged");
        Ok(StagedAsset { path })
    }

    /// Reserve a request-unique scratch path (not created) for transformer
    /// output, carrying the real extension so the transformer can pick its
    /// container format from it.
    pub fn scratch_path(&self, extension: &str) -> PathBuf {
        self.root.join(format!("{}.{}", Uuid::new_v4(), extension))
    }
}

/// Guard over one staged file.
#[derive(Debug)]
pub struct StagedAsset {
    path: PathBuf,
}

impl StagedAsset {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedAsset {
    fn drop(&mut self) {
        // Best effort; a leaked staging file is reclaimed by the next clear.
        let _ = std::fs::remove_file(&self.path);
    }
}
