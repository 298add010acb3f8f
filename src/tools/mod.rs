//! Tools and the stroke renderers behind them.
//!
//! Renderers are plain functions over a [`RasterContext`]; they never read editor
//! state directly. Everything they need arrives in a [`Stroke`].

use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

use crate::raster::RasterContext;
use crate::state::config::{PaintKind, ToolConfig};

pub mod brushes;
pub mod fill;
pub mod shapes;
pub mod text;

pub use fill::{flood_fill, sample_color};
pub use shapes::ShapeStyle;
pub use text::TextStamper;

/// Every tool the editor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Pencil,
    InkPencil,
    PaintBrush,
    PixelBrush,
    FogPencil,
    Eraser,
    FadeEraser,
    Line,
    Rectangle,
    Ellipse,
    Gradient,
    Eyedropper,
    Fill,
    Text,
}

/// How a tool reacts to a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolBehavior {
    /// Paints on every pointer move and commits when the gesture ends.
    Continuous,
    /// Shows a live preview over a temporary baseline and commits the final primitive.
    Shape,
    /// Acts once on gesture start.
    Point,
}

impl ToolKind {
    pub const ALL: [ToolKind; 14] = [
        ToolKind::Pencil,
        ToolKind::InkPencil,
        ToolKind::PaintBrush,
        ToolKind::PixelBrush,
        ToolKind::FogPencil,
        ToolKind::Eraser,
        ToolKind::FadeEraser,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Gradient,
        ToolKind::Eyedropper,
        ToolKind::Fill,
        ToolKind::Text,
    ];

    /// Stable identifier used by settings and the tool palette.
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Pencil => "pencil",
            ToolKind::InkPencil => "inkpencil",
            ToolKind::PaintBrush => "paintbrush",
            ToolKind::PixelBrush => "pixelbrush",
            ToolKind::FogPencil => "fogpencil",
            ToolKind::Eraser => "eraser",
            ToolKind::FadeEraser => "faderaser",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Ellipse => "circle",
            ToolKind::Gradient => "gradient",
            ToolKind::Eyedropper => "eyedropper",
            ToolKind::Fill => "fill",
            ToolKind::Text => "text",
        }
    }

    /// Looks a tool up by [`Self::name`]. Unknown names give `None`.
    pub fn from_name(name: &str) -> Option<ToolKind> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Pencil => "✏ Pencil",
            ToolKind::InkPencil => "✒ Ink",
            ToolKind::PaintBrush => "🖌 Paint",
            ToolKind::PixelBrush => "▦ Pixel",
            ToolKind::FogPencil => "☁ Fog",
            ToolKind::Eraser => "⌫ Eraser",
            ToolKind::FadeEraser => "◌ Fade eraser",
            ToolKind::Line => "╱ Line",
            ToolKind::Rectangle => "▭ Rectangle",
            ToolKind::Ellipse => "◯ Circle",
            ToolKind::Gradient => "▤ Gradient",
            ToolKind::Eyedropper => "💧 Eyedropper",
            ToolKind::Fill => "🪣 Fill",
            ToolKind::Text => "🅰 Text",
        }
    }

    pub fn behavior(&self) -> ToolBehavior {
        match self {
            ToolKind::Line | ToolKind::Rectangle | ToolKind::Ellipse | ToolKind::Gradient => ToolBehavior::Shape,
            ToolKind::Eyedropper | ToolKind::Fill | ToolKind::Text => ToolBehavior::Point,
            _ => ToolBehavior::Continuous,
        }
    }

    /// The per-move renderer for continuous tools.
    pub fn stroke_renderer(&self) -> Option<StrokeFn> {
        let renderer: StrokeFn = match self {
            ToolKind::Pencil => brushes::pencil,
            ToolKind::InkPencil => brushes::ink_pencil,
            ToolKind::PaintBrush => brushes::paint_brush,
            ToolKind::PixelBrush => brushes::pixel_brush,
            ToolKind::FogPencil => brushes::fog_pencil,
            ToolKind::Eraser => brushes::eraser,
            ToolKind::FadeEraser => brushes::fade_eraser,
            _ => return None,
        };
        Some(renderer)
    }
}

/// A stroke renderer.
pub type StrokeFn = fn(&mut RasterContext<'_>, &Stroke);

/// One renderer call: a segment from `previous` to `point` plus the settings in force.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub point: Pos2,
    pub previous: Pos2,
    pub size: f32,
    pub color: Color32,
    pub opacity: f32,
    pub zoom: f32,
    pub hardness: f32,
    pub paint: PaintKind,
    /// Seeds the watercolour jitter so a stroke renders the same way every time.
    pub seed: u64,
}

impl Stroke {
    pub fn new(previous: Pos2, point: Pos2, config: &ToolConfig, zoom: f32) -> Self {
        Self {
            point,
            previous,
            size: config.brush_size,
            color: config.primary,
            opacity: config.opacity,
            zoom,
            hardness: config.hardness,
            paint: config.paint,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The same stroke between two other points.
    pub fn between(mut self, previous: Pos2, point: Pos2) -> Self {
        self.previous = previous;
        self.point = point;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for tool in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(tool.name()), Some(tool));
        }
        assert_eq!(ToolKind::from_name("lasso"), None);
    }

    #[test]
    fn test_only_continuous_tools_have_renderers() {
        for tool in ToolKind::ALL {
            assert_eq!(tool.stroke_renderer().is_some(), tool.behavior() == ToolBehavior::Continuous);
        }
    }
}
