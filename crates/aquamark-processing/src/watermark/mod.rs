//! External watermark transformation: filter construction and the
//! supervised ffmpeg invocation.

mod filter;
mod runner;

pub use filter::DrawtextFilter;
pub use runner::{RunnerError, VariantTransformer, WatermarkRunner};
