pub mod asset;
pub mod outcome;
pub mod transform;

pub use asset::{MediaKind, UploadedAsset};
pub use outcome::ProcessOutcome;
pub use transform::{ContentFingerprint, Rotation, TransformParameters, WatermarkStyle};
