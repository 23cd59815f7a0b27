//! Service layer for the aquamark rendition engine.
//!
//! [`RenditionService`] is the public entry point: given an uploaded asset
//! and a set of requested variant labels it drives staging, fingerprinting,
//! orientation inspection, cache lookup and — on miss — the external
//! transformation, returning paths to every requested rendition or a
//! failure naming the stage that broke.

pub mod orchestrator;
pub mod single_flight;

pub use orchestrator::{RenditionService, StoredRendition};
pub use single_flight::{FlightOutcome, SingleFlight};
