//! Streaming content fingerprinting.
//!
//! Assets are hashed in fixed-size chunks so memory stays constant
//! regardless of asset size. The digest is deterministic across process
//! restarts and used only for cache addressing, never authentication.

use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::io::{AsyncRead, AsyncReadExt};

use aquamark_core::models::ContentFingerprint;

const CHUNK_SIZE: usize = 8192;

/// Hash a byte stream into a fingerprint.
///
/// Any read error aborts the whole computation — a partial read must never
/// produce a silently-wrong fingerprint.
pub async fn fingerprint_reader<R>(mut reader: R) -> std::io::Result<ContentFingerprint>
where
    R: AsyncRead + Unpin,
{
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(ContentFingerprint::new(hex::encode(hasher.finalize())))
}

/// Hash a file on disk.
pub async fn fingerprint_file(path: &Path) -> std::io::Result<ContentFingerprint> {
    let file = tokio::fs::File::open(path).await?;
    fingerprint_reader(file).await
}
