use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_BACKGROUND: Color32 = Color32::from_rgb(0x22, 0x22, 0x22);
/// Largest accepted width or height.
pub const MAX_DIMENSION: u32 = 8192;
/// Largest accepted pixel count; every undo step holds a full copy of the buffer.
pub const MAX_PIXELS: u64 = 4096 * 4096;

/// Size and background of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background: Color32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: DEFAULT_BACKGROUND,
        }
    }
}

impl CanvasConfig {
    pub fn new(width: u32, height: u32, background: Color32) -> Result<Self, ConfigError> {
        if width == 0 {
            return Err(ConfigError::InvalidDimension { axis: "width", value: width.to_string() });
        }
        if height == 0 {
            return Err(ConfigError::InvalidDimension { axis: "height", value: height.to_string() });
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION || width as u64 * height as u64 > MAX_PIXELS {
            return Err(ConfigError::TooLarge { width, height });
        }
        Ok(Self { width, height, background })
    }

    /// Builds a config from raw form fields, e.g. `("1024", "768", "#ffffff")`.
    pub fn parse(width: &str, height: &str, background: &str) -> Result<Self, ConfigError> {
        let width = parse_dimension("width", width)?;
        let height = parse_dimension("height", height)?;
        let background = parse_color(background)?;
        Self::new(width, height, background)
    }
}

fn parse_dimension(axis: &'static str, raw: &str) -> Result<u32, ConfigError> {
    let invalid = || ConfigError::InvalidDimension { axis, value: raw.to_owned() };
    let value: u32 = raw.trim().parse().map_err(|_| invalid())?;
    if value == 0 {
        return Err(invalid());
    }
    Ok(value)
}

/// Parses `#rrggbb` / `#rrggbbaa` (the leading `#` is optional).
pub fn parse_color(raw: &str) -> Result<Color32, ConfigError> {
    let trimmed = raw.trim();
    let hex = if trimmed.starts_with('#') { trimmed.to_owned() } else { format!("#{trimmed}") };
    Color32::from_hex(&hex).map_err(|_| ConfigError::InvalidColor(raw.to_owned()))
}

/// Watercolour, oil or plain paint for the paint brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaintKind {
    Water,
    Oil,
    #[default]
    Stark,
}

impl PaintKind {
    pub const ALL: [PaintKind; 3] = [PaintKind::Water, PaintKind::Oil, PaintKind::Stark];

    pub fn label(&self) -> &'static str {
        match self {
            PaintKind::Water => "Water",
            PaintKind::Oil => "Oil",
            PaintKind::Stark => "Stark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

/// Values the stroke renderers read at stroke time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub brush_size: f32,
    pub opacity: f32,
    pub primary: Color32,
    pub secondary: Color32,
    pub hardness: f32,
    pub fill_shapes: bool,
    pub shape_stroke_width: f32,
    pub gradient: GradientKind,
    pub paint: PaintKind,
    /// Text stamped by the text tool.
    pub text: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            brush_size: 5.0,
            opacity: 1.0,
            primary: Color32::WHITE,
            secondary: Color32::BLACK,
            hardness: 1.0,
            fill_shapes: false,
            shape_stroke_width: 2.0,
            gradient: GradientKind::Linear,
            paint: PaintKind::Stark,
            text: "Hello!".to_owned(),
        }
    }
}

pub const BRUSH_SIZE_RANGE: std::ops::RangeInclusive<f32> = 1.0..=100.0;
pub const HARDNESS_RANGE: std::ops::RangeInclusive<f32> = 0.1..=1.0;
pub const STROKE_WIDTH_RANGE: std::ops::RangeInclusive<f32> = 1.0..=50.0;

impl ToolConfig {
    pub fn set_brush_size(&mut self, size: f32) {
        self.brush_size = size.clamp(*BRUSH_SIZE_RANGE.start(), *BRUSH_SIZE_RANGE.end());
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn set_hardness(&mut self, hardness: f32) {
        self.hardness = hardness.clamp(*HARDNESS_RANGE.start(), *HARDNESS_RANGE.end());
    }

    pub fn set_shape_stroke_width(&mut self, width: f32) {
        self.shape_stroke_width = width.clamp(*STROKE_WIDTH_RANGE.start(), *STROKE_WIDTH_RANGE.end());
    }

    pub fn swap_colors(&mut self) {
        std::mem::swap(&mut self.primary, &mut self.secondary);
    }

    /// Runs every numeric field through its setter, e.g. after loading hand-edited JSON.
    pub fn sanitized(mut self) -> Self {
        let sane = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };
        let defaults = Self::default();
        self.set_brush_size(sane(self.brush_size, defaults.brush_size));
        self.set_opacity(sane(self.opacity, defaults.opacity));
        self.set_hardness(sane(self.hardness, defaults.hardness));
        self.set_shape_stroke_width(sane(self.shape_stroke_width, defaults.shape_stroke_width));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_config() {
        let config = CanvasConfig::parse("1024", " 768 ", "#ffffff").unwrap();
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 768);
        assert_eq!(config.background, Color32::WHITE);
    }

    #[test]
    fn test_parse_rejects_bad_dimensions() {
        assert!(matches!(
            CanvasConfig::parse("abc", "600", "#222222"),
            Err(ConfigError::InvalidDimension { axis: "width", .. })
        ));
        assert!(matches!(
            CanvasConfig::parse("800", "0", "#222222"),
            Err(ConfigError::InvalidDimension { axis: "height", .. })
        ));
        assert!(CanvasConfig::parse("-5", "600", "#222222").is_err());
    }

    #[test]
    fn test_parse_rejects_oversized_canvas() {
        assert_eq!(
            CanvasConfig::parse("4294967295", "4294967295", "#222222"),
            Err(ConfigError::TooLarge { width: u32::MAX, height: u32::MAX })
        );
        assert!(matches!(CanvasConfig::parse("9000", "10", "#222222"), Err(ConfigError::TooLarge { .. })));
        // Each side is fine on its own, the area is not.
        assert!(matches!(CanvasConfig::parse("8192", "8192", "#222222"), Err(ConfigError::TooLarge { .. })));
        assert!(CanvasConfig::parse("4096", "4096", "#222222").is_ok());
        assert!(CanvasConfig::parse("8192", "100", "#222222").is_ok());
    }

    #[test]
    fn test_parse_rejects_bad_color() {
        assert_eq!(
            CanvasConfig::parse("800", "600", "not a colour"),
            Err(ConfigError::InvalidColor("not a colour".to_owned()))
        );
    }

    #[test]
    fn test_setters_clamp() {
        let mut config = ToolConfig::default();
        config.set_opacity(3.0);
        config.set_hardness(0.0);
        config.set_brush_size(-1.0);
        assert_eq!(config.opacity, 1.0);
        assert_eq!(config.hardness, 0.1);
        assert_eq!(config.brush_size, 1.0);
    }

    #[test]
    fn test_sanitized_clamps_loaded_values() {
        let mut config = ToolConfig::default();
        config.brush_size = -20.0;
        config.opacity = 7.5;
        config.hardness = f32::NAN;
        config.shape_stroke_width = 500.0;

        let config = config.sanitized();
        assert_eq!(config.brush_size, 1.0);
        assert_eq!(config.opacity, 1.0);
        assert_eq!(config.hardness, 1.0);
        assert_eq!(config.shape_stroke_width, 50.0);
    }
}
