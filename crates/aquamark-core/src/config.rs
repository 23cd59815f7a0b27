//! Configuration module
//!
//! Engine configuration is read from the environment with sensible
//! defaults. `validate()` failures are fatal at startup — an empty variant
//! label or watermark text never surfaces as a per-request error.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::{MediaKind, WatermarkStyle};

const DEFAULT_STORE_ROOT: &str = "store";
const DEFAULT_STAGING_ROOT: &str = "staging";
const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";
const DEFAULT_FONT_PATH: &str = "fonts/Lato-Regular.ttf";
const DEFAULT_OPACITY: f32 = 0.5;
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
const DEFAULT_IMAGE_VARIANTS: &str = "black,white";
const DEFAULT_VIDEO_VARIANTS: &str = "white";
const DEFAULT_ANIMATION_VARIANTS: &str = "white";

/// Engine configuration.
///
/// The per-media-kind variant sets are explicit configuration rather than
/// being inferred from content types; images default to both watermark
/// colors, video and animation to white only.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Root of the durable content-addressed rendition store.
    pub store_root: PathBuf,
    /// Transient staging area for uploaded assets awaiting transformation.
    pub staging_root: PathBuf,
    /// Program invoked as the external transformer.
    pub ffmpeg_path: String,
    pub font_path: String,
    pub watermark_text: String,
    pub watermark_opacity: f32,
    /// Interval between non-blocking polls of a running transformer.
    pub poll_interval_ms: u64,
    /// Upper bound on one transformation; `None` waits indefinitely.
    pub max_transform_wait_secs: Option<u64>,
    pub image_variants: Vec<String>,
    pub video_variants: Vec<String>,
    pub animation_variants: Vec<String>,
}

fn parse_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let image_variants = parse_labels(
            &env::var("AQUAMARK_IMAGE_VARIANTS")
                .unwrap_or_else(|_| DEFAULT_IMAGE_VARIANTS.to_string()),
        );
        let video_variants = parse_labels(
            &env::var("AQUAMARK_VIDEO_VARIANTS")
                .unwrap_or_else(|_| DEFAULT_VIDEO_VARIANTS.to_string()),
        );
        let animation_variants = parse_labels(
            &env::var("AQUAMARK_ANIMATION_VARIANTS")
                .unwrap_or_else(|_| DEFAULT_ANIMATION_VARIANTS.to_string()),
        );

        Ok(EngineConfig {
            store_root: env::var("AQUAMARK_STORE_ROOT")
                .unwrap_or_else(|_| DEFAULT_STORE_ROOT.to_string())
                .into(),
            staging_root: env::var("AQUAMARK_STAGING_ROOT")
                .unwrap_or_else(|_| DEFAULT_STAGING_ROOT.to_string())
                .into(),
            ffmpeg_path: env::var("FFMPEG_PATH")
                .unwrap_or_else(|_| DEFAULT_FFMPEG_PATH.to_string()),
            font_path: env::var("WATERMARK_FONT_PATH")
                .unwrap_or_else(|_| DEFAULT_FONT_PATH.to_string()),
            watermark_text: env::var("WATERMARK_TEXT").unwrap_or_else(|_| "aquamark".to_string()),
            watermark_opacity: env::var("WATERMARK_OPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_OPACITY),
            poll_interval_ms: env::var("AQUAMARK_POLL_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            max_transform_wait_secs: env::var("AQUAMARK_MAX_TRANSFORM_WAIT_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
            image_variants,
            video_variants,
            animation_variants,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.watermark_text.trim().is_empty() {
            anyhow::bail!("WATERMARK_TEXT must not be empty");
        }
        if !(0.0..=1.0).contains(&self.watermark_opacity) {
            anyhow::bail!(
                "WATERMARK_OPACITY must be within 0.0..=1.0, got {}",
                self.watermark_opacity
            );
        }
        if self.poll_interval_ms == 0 {
            anyhow::bail!("AQUAMARK_POLL_INTERVAL_MS must be greater than zero");
        }
        if self.all_labels().is_empty() {
            anyhow::bail!("at least one variant label must be configured");
        }
        for label in self.all_labels() {
            if label.contains('/') || label.contains("..") {
                anyhow::bail!("variant label '{}' contains path characters", label);
            }
        }
        Ok(())
    }

    /// Variant labels produced by default for a given media kind.
    pub fn default_labels_for(&self, kind: MediaKind) -> &[String] {
        match kind {
            MediaKind::Image => &self.image_variants,
            MediaKind::Video => &self.video_variants,
            MediaKind::Animation => &self.animation_variants,
        }
    }

    /// Every configured label, deduplicated; the store creates one
    /// directory per entry before first use.
    pub fn all_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for label in self
            .image_variants
            .iter()
            .chain(&self.video_variants)
            .chain(&self.animation_variants)
        {
            if !labels.iter().any(|l| l == label) {
                labels.push(label.clone());
            }
        }
        labels
    }

    /// Rendering style for one variant label. The label doubles as the
    /// drawtext font color, matching the black/white watermark scheme.
    pub fn style_for(&self, label: &str) -> WatermarkStyle {
        WatermarkStyle {
            label: label.to_string(),
            color: label.to_string(),
            opacity: self.watermark_opacity,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn max_transform_wait(&self) -> Option<Duration> {
        self.max_transform_wait_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> EngineConfig {
        EngineConfig {
            store_root: "store".into(),
            staging_root: "staging".into(),
            ffmpeg_path: "ffmpeg".to_string(),
            font_path: DEFAULT_FONT_PATH.to_string(),
            watermark_text: "aquamark".to_string(),
            watermark_opacity: DEFAULT_OPACITY,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_transform_wait_secs: None,
            image_variants: vec!["black".to_string(), "white".to_string()],
            video_variants: vec!["white".to_string()],
            animation_variants: vec!["white".to_string()],
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_empty_watermark_text_rejected() {
        let mut config = base_config();
        config.watermark_text = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_opacity_rejected() {
        let mut config = base_config();
        config.watermark_opacity = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_label_with_path_characters_rejected() {
        let mut config = base_config();
        config.image_variants = vec!["../evil".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_labels_rejected() {
        let mut config = base_config();
        config.image_variants.clear();
        config.video_variants.clear();
        config.animation_variants.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_all_labels_deduplicates() {
        let config = base_config();
        assert_eq!(config.all_labels(), vec!["black", "white"]);
    }

    #[test]
    fn test_default_labels_per_kind() {
        let config = base_config();
        assert_eq!(
            config.default_labels_for(MediaKind::Image),
            &["black", "white"]
        );
        assert_eq!(config.default_labels_for(MediaKind::Video), &["white"]);
        assert_eq!(config.default_labels_for(MediaKind::Animation), &["white"]);
    }

    #[test]
    fn test_parse_labels_trims_and_drops_empty() {
        assert_eq!(parse_labels("black, white ,"), vec!["black", "white"]);
        assert!(parse_labels("").is_empty());
    }

    #[test]
    fn test_style_uses_label_as_color() {
        let config = base_config();
        let style = config.style_for("white");
        assert_eq!(style.label, "white");
        assert_eq!(style.color, "white");
        assert_eq!(style.opacity, DEFAULT_OPACITY);
    }
}
