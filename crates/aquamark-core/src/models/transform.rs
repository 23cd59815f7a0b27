//! Content fingerprint and transform parameter models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Deterministic digest of an asset's bytes, used only as a cache key
/// component — never for authentication. Identical byte sequences always
/// yield identical fingerprints across process restarts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentFingerprint(String);

impl ContentFingerprint {
    pub fn new(hex_digest: impl Into<String>) -> Self {
        Self(hex_digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rotation applied during transformation, drawn from a closed set.
/// Defaults to no rotation whenever orientation metadata is absent,
/// malformed, or carries an unrecognized code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    Degrees90,
    Degrees180,
    Degrees270,
}

impl Rotation {
    /// Map an EXIF orientation code to a rotation. Codes 3, 6 and 8 are the
    /// pure rotations; every other code (including the mirrored variants)
    /// maps to no rotation.
    pub fn from_exif_code(code: u32) -> Self {
        match code {
            3 => Rotation::Degrees180,
            6 => Rotation::Degrees90,
            8 => Rotation::Degrees270,
            _ => Rotation::None,
        }
    }

    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Degrees90 => 90,
            Rotation::Degrees180 => 180,
            Rotation::Degrees270 => 270,
        }
    }

    /// Angle expression for the ffmpeg `rotate` filter.
    pub fn as_filter_expr(&self) -> &'static str {
        match self {
            Rotation::None => "0",
            Rotation::Degrees90 => "PI/2",
            Rotation::Degrees180 => "PI",
            Rotation::Degrees270 => "3*PI/2",
        }
    }
}

/// Content-dependent transform knobs, derived once per asset and consumed
/// by the process runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformParameters {
    pub rotation: Rotation,
}

/// Stylistic parameters for one watermark variant. The label doubles as the
/// store directory name; the color and opacity feed the drawtext filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkStyle {
    pub label: String,
    pub color: String,
    pub opacity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exif_code_mapping() {
        assert_eq!(Rotation::from_exif_code(3), Rotation::Degrees180);
        assert_eq!(Rotation::from_exif_code(6), Rotation::Degrees90);
        assert_eq!(Rotation::from_exif_code(8), Rotation::Degrees270);
        // Normal, mirrored and out-of-range codes all default
        assert_eq!(Rotation::from_exif_code(1), Rotation::None);
        assert_eq!(Rotation::from_exif_code(2), Rotation::None);
        assert_eq!(Rotation::from_exif_code(5), Rotation::None);
        assert_eq!(Rotation::from_exif_code(7), Rotation::None);
        assert_eq!(Rotation::from_exif_code(0), Rotation::None);
        assert_eq!(Rotation::from_exif_code(99), Rotation::None);
    }

    #[test]
    fn test_filter_expressions() {
        assert_eq!(Rotation::None.as_filter_expr(), "0");
        assert_eq!(Rotation::Degrees90.as_filter_expr(), "PI/2");
        assert_eq!(Rotation::Degrees180.as_filter_expr(), "PI");
        assert_eq!(Rotation::Degrees270.as_filter_expr(), "3*PI/2");
    }

    #[test]
    fn test_default_parameters_carry_no_rotation() {
        let params = TransformParameters::default();
        assert_eq!(params.rotation, Rotation::None);
        assert_eq!(params.rotation.degrees(), 0);
    }

    #[test]
    fn test_fingerprint_display_roundtrip() {
        let fp = ContentFingerprint::new("abc123");
        assert_eq!(fp.to_string(), "abc123");
        assert_eq!(fp.as_str(), "abc123");

        let json = serde_json::to_string(&fp).unwrap();
        let back: ContentFingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fp, back);
    }
}
