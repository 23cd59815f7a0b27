//! Shared key building for the rendition store.
//!
//! Key format: `{label}/{fingerprint}.{extension}`. Two assets with
//! identical bytes map to the identical key for a given label, regardless
//! of upload time or original filename.

use std::fmt;

use aquamark_core::models::ContentFingerprint;

use crate::store::{StoreError, StoreResult};

/// Canonical cache key for one variant of one asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenditionKey {
    fingerprint: ContentFingerprint,
    extension: String,
    label: String,
}

fn validate_component(name: &str, value: &str) -> StoreResult<()> {
    if value.is_empty() {
        return Err(StoreError::InvalidKey(format!("{} must not be empty", name)));
    }
    if value.contains('/') || value.contains('\\') || value.contains("..") {
        return Err(StoreError::InvalidKey(format!(
            "{} '{}' contains path characters",
            name, value
        )));
    }
    Ok(())
}

impl RenditionKey {
    /// Build a key. Pure; the only failure mode is an empty or
    /// traversal-carrying extension or label, which is a configuration
    /// error rather than a per-request condition.
    pub fn new(
        fingerprint: &ContentFingerprint,
        extension: &str,
        label: &str,
    ) -> StoreResult<Self> {
        validate_component("extension", extension)?;
        validate_component("variant label", label)?;
        validate_component("fingerprint", fingerprint.as_str())?;
        Ok(RenditionKey {
            fingerprint: fingerprint.clone(),
            extension: extension.to_string(),
            label: label.to_string(),
        })
    }

    pub fn fingerprint(&self) -> &ContentFingerprint {
        &self.fingerprint
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Canonical entry filename: `{fingerprint}.{extension}`.
    pub fn filename(&self) -> String {
        format!("{}.{}", self.fingerprint, self.extension)
    }

    /// Path relative to the store root: `{label}/{fingerprint}.{extension}`.
    pub fn relative_path(&self) -> String {
        format!("{}/{}", self.label, self.filename())
    }
}

impl fmt::Display for RenditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(hex: &str) -> ContentFingerprint {
        ContentFingerprint::new(hex)
    }

    #[test]
    fn test_key_layout() {
        let key = RenditionKey::new(&fp("d41d8cd9"), "jpg", "black").unwrap();
        assert_eq!(key.filename(), "d41d8cd9.jpg");
        assert_eq!(key.relative_path(), "black/d41d8cd9.jpg");
        assert_eq!(key.to_string(), "black/d41d8cd9.jpg");
    }

    #[test]
    fn test_identical_inputs_build_identical_keys() {
        let a = RenditionKey::new(&fp("cafe"), "png", "white").unwrap();
        let b = RenditionKey::new(&fp("cafe"), "png", "white").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_components_rejected() {
        assert!(matches!(
            RenditionKey::new(&fp("cafe"), "", "white"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(
            RenditionKey::new(&fp("cafe"), "png", ""),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(
            RenditionKey::new(&fp(""), "png", "white"),
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_traversal_components_rejected() {
        assert!(RenditionKey::new(&fp("cafe"), "png", "../white").is_err());
        assert!(RenditionKey::new(&fp("cafe"), "png/evil", "white").is_err());
        assert!(RenditionKey::new(&fp("..cafe.."), "png", "white").is_err());
    }
}
