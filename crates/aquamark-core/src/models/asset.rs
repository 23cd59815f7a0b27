//! Uploaded asset model

use serde::{Deserialize, Serialize};

/// Declared kind of an uploaded media asset.
///
/// Orientation metadata is only inspected for image-like assets; video and
/// animation uploads commonly carry none, which is expected and non-fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Animation,
}

impl MediaKind {
    /// Map the top-level MIME type delivered by the front end
    /// (e.g. `image/jpeg` → `image`) to a media kind.
    pub fn from_mime_kind(kind: &str) -> Option<Self> {
        match kind {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            "animation" => Some(MediaKind::Animation),
            _ => None,
        }
    }

    pub fn is_image_like(&self) -> bool {
        matches!(self, MediaKind::Image)
    }
}

/// An uploaded asset as delivered by the front end: raw bytes, declared
/// kind, and file extension. Ephemeral; owned by the orchestrator for the
/// duration of one request. The original bytes are never cached.
#[derive(Debug, Clone)]
pub struct UploadedAsset {
    pub data: Vec<u8>,
    pub kind: MediaKind,
    pub extension: String,
}

impl UploadedAsset {
    pub fn new(data: Vec<u8>, kind: MediaKind, extension: impl Into<String>) -> Self {
        Self {
            data,
            kind,
            extension: extension.into().to_lowercase(),
        }
    }
}
