//! Durable storage for the aquamark rendition engine.
//!
//! Two filesystem namespaces live here. The [`RenditionStore`] is the
//! content-addressed cache: one directory per variant label, entries named
//! `{fingerprint}.{extension}`, written once via atomic publish and read
//! many times. The [`StagingArea`] is the transient side: request-unique
//! files holding an uploaded asset for the duration of processing.
//!
//! # Key format
//!
//! Keys are built centrally in the `keys` module as
//! `{label}/{fingerprint}.{extension}`. Keys must not be empty or contain
//! path separators or `..`.

pub mod keys;
pub mod staging;
pub mod store;

pub use keys::RenditionKey;
pub use staging::{StagedAsset, StagingArea};
pub use store::{RenditionStore, StoreError, StoreResult};
