//! Best-effort orientation inspection.
//!
//! Metadata absence is an expected, non-exceptional condition (video and
//! animation assets rarely carry EXIF at all), so nothing here raises
//! upward. The scan result keeps `NotFound` and `Malformed` distinguishable
//! for logging; both collapse to the default rotation.

use std::io::Cursor;

use aquamark_core::models::{Rotation, TransformParameters};

/// Outcome of scanning an asset for orientation metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationScan {
    /// An orientation tag was present; unrecognized codes carry
    /// `Rotation::None`.
    Found(Rotation),
    /// The container parsed but held no orientation metadata.
    NotFound,
    /// The metadata (or the container itself) could not be parsed.
    Malformed,
}

/// Scan asset bytes for an EXIF orientation tag.
pub fn scan_orientation(data: &[u8]) -> OrientationScan {
    let mut cursor = Cursor::new(data);
    let exif = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return OrientationScan::NotFound,
        Err(_) => return OrientationScan::Malformed,
    };

    match exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY) {
        Some(field) => match field.value.get_uint(0) {
            Some(code) => OrientationScan::Found(Rotation::from_exif_code(code)),
            None => OrientationScan::Malformed,
        },
        None => OrientationScan::NotFound,
    }
}

/// Derive transform parameters from an asset, degrading to no rotation on
/// absent or unreadable metadata.
pub fn inspect_orientation(data: &[u8]) -> TransformParameters {
    let rotation = match scan_orientation(data) {
        OrientationScan::Found(rotation) => {
            tracing::debug!(degrees = rotation.degrees(), "orientation tag found");
            rotation
        }
        OrientationScan::NotFound => {
            tracing::debug!("no orientation metadata, using default rotation");
            Rotation::None
        }
        OrientationScan::Malformed => {
            tracing::debug!("unreadable orientation metadata, using default rotation");
            Rotation::None
        }
    };
    TransformParameters { rotation }
}
