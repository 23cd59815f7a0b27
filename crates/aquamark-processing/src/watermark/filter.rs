//! ffmpeg drawtext filter construction.

use aquamark_core::models::{Rotation, WatermarkStyle};

/// Video filter string for one watermark rendering: text overlay in the
/// bottom-right corner, size-relative font scale, optional rotation.
#[derive(Debug, Clone)]
pub struct DrawtextFilter {
    font_path: String,
    text: String,
    color: String,
    opacity: f32,
    rotation: Rotation,
}

impl DrawtextFilter {
    pub fn new(font_path: &str, text: &str, style: &WatermarkStyle, rotation: Rotation) -> Self {
        Self {
            font_path: font_path.to_string(),
            text: text.to_string(),
            color: style.color.clone(),
            opacity: style.opacity,
            rotation,
        }
    }

    /// Render the `-vf` argument. The font size and position formulas are
    /// relative to the frame dimensions so one filter fits any resolution.
    pub fn render(&self) -> String {
        let text = self.text.replace('\'', "\\'");
        [
            format!("drawtext=fontfile={}", self.font_path),
            format!("text='{}'", text),
            format!("fontcolor={}@{}", self.color, self.opacity),
            "fontsize=w*0.1".to_string(),
            format!(
                "x=w-tw-h*0.12/6:y=h-th-h*0.12/6,rotate={}",
                self.rotation.as_filter_expr()
            ),
        ]
        .join(":")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(label: &str) -> WatermarkStyle {
        WatermarkStyle {
            label: label.to_string(),
            color: label.to_string(),
            opacity: 0.5,
        }
    }

    #[test]
    fn test_render_matches_expected_layout() {
        let filter = DrawtextFilter::new(
            "/app/fonts/Lato-Regular.ttf",
            "example.com",
            &style("white"),
            Rotation::None,
        );
        assert_eq!(
            filter.render(),
            "drawtext=fontfile=/app/fonts/Lato-Regular.ttf:text='example.com':\
             fontcolor=white@0.5:fontsize=w*0.1:x=w-tw-h*0.12/6:y=h-th-h*0.12/6,rotate=0"
        );
    }

    #[test]
    fn test_rotation_expression_included() {
        let filter = DrawtextFilter::new("font.ttf", "wm", &style("black"), Rotation::Degrees90);
        assert!(filter.render().ends_with("rotate=PI/2"));

        let filter = DrawtextFilter::new("font.ttf", "wm", &style("black"), Rotation::Degrees180);
        assert!(filter.render().ends_with("rotate=PI"));
    }

    #[test]
    fn test_single_quotes_escaped() {
        let filter = DrawtextFilter::new("font.ttf", "it's mine", &style("white"), Rotation::None);
        assert!(filter.render().contains("text='it\\'s mine'"));
    }
}
