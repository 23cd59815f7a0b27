//! Asset processing for the aquamark rendition engine: content
//! fingerprinting, orientation inspection, and the external watermark
//! transformer invocation.

pub mod fingerprint;
pub mod orientation;
pub mod watermark;

pub use fingerprint::{fingerprint_file, fingerprint_reader};
pub use orientation::{inspect_orientation, scan_orientation, OrientationScan};
pub use watermark::{DrawtextFilter, RunnerError, VariantTransformer, WatermarkRunner};
