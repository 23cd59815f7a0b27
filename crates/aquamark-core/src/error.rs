//! Error types module
//!
//! A request against the engine resolves to a single terminal outcome. The
//! `EngineError` enum covers every stage that can fail a request (staging,
//! fingerprinting, transformation, storage) plus configuration errors that
//! are fatal at startup. Metadata parse failures are deliberately absent:
//! the orientation inspector degrades to the default instead of erroring.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Writing the uploaded asset to the staging area failed.
    #[error("Failed to stage asset: {0}")]
    Staging(#[source] io::Error),

    /// Reading the staged asset for fingerprinting failed. A partial read
    /// never produces a fingerprint; the whole computation is abandoned.
    #[error("Failed to fingerprint asset: {0}")]
    Fingerprint(#[source] io::Error),

    /// The external transformer failed for one variant. Remaining variants
    /// in the request are not attempted.
    #[error("Transformation failed for variant '{label}': {reason}")]
    Transform { label: String, reason: String },

    /// Reading from or publishing into the rendition store failed.
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid configuration (empty variant label, missing directories).
    /// Fatal at startup, never produced per-request under a valid config.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Name of the stage that failed, for logs and caller-facing reports.
    pub fn stage(&self) -> &'static str {
        match self {
            EngineError::Staging(_) => "staging",
            EngineError::Fingerprint(_) => "fingerprinting",
            EngineError::Transform { .. } => "transformation",
            EngineError::Store(_) => "storage",
            EngineError::Config(_) => "configuration",
        }
    }

    /// Whether the caller may retry the request as-is. Transient I/O is
    /// retryable; a transformer rejection or bad configuration is not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::Staging(_) | EngineError::Fingerprint(_) | EngineError::Store(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_error_names_variant() {
        let err = EngineError::Transform {
            label: "black".to_string(),
            reason: "exit status 1".to_string(),
        };
        assert_eq!(err.stage(), "transformation");
        assert!(err.to_string().contains("black"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_io_stages_are_retryable() {
        let staging = EngineError::Staging(io::Error::other("disk full"));
        assert_eq!(staging.stage(), "staging");
        assert!(staging.is_retryable());

        let store = EngineError::Store("rename failed".to_string());
        assert_eq!(store.stage(), "storage");
        assert!(store.is_retryable());
    }

    #[test]
    fn test_config_error_is_not_retryable() {
        let err = EngineError::Config("empty variant label".to_string());
        assert_eq!(err.stage(), "configuration");
        assert!(!err.is_retryable());
    }
}
