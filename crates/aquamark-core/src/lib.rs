//! Core types for the aquamark rendition engine: configuration, the unified
//! request-level error type, and the domain models shared by the storage,
//! processing and service crates.

pub mod config;
pub mod error;
pub mod models;

pub use config::EngineConfig;
pub use error::EngineError;
