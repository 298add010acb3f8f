use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use egui::{Color32, Pos2};

use crate::raster::{RasterContext, rgb};

/// Font from egui's bundled set used when stamping text.
const STAMP_FONT: &str = "Ubuntu-Light";

/// Rasterizes single-line text into the canvas.
#[derive(Clone)]
pub struct TextStamper {
    font: FontArc,
}

impl std::fmt::Debug for TextStamper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextStamper").finish_non_exhaustive()
    }
}

impl TextStamper {
    pub fn new(font: FontArc) -> Self {
        Self { font }
    }

    /// Loads one of the fonts egui ships with. Returns `None` if none of them parse.
    pub fn with_default_font() -> Option<Self> {
        let definitions = egui::FontDefinitions::default();
        let data = definitions
            .font_data
            .get(STAMP_FONT)
            .or_else(|| definitions.font_data.values().next())?;
        match FontArc::try_from_vec(data.font.to_vec()) {
            Ok(font) => Some(Self::new(font)),
            Err(err) => {
                log::warn!("bundled font could not be parsed: {err}");
                None
            }
        }
    }

    /// Draws `text` with its baseline starting at `origin`. Returns false for empty text.
    pub fn stamp(&self, ctx: &mut RasterContext<'_>, text: &str, origin: Pos2, px: f32, color: Color32, alpha: f32) -> bool {
        if text.is_empty() || px <= 0.0 {
            return false;
        }
        let scale = PxScale::from(px);
        let scaled = self.font.as_scaled(scale);
        let color = rgb(color);

        let mut cursor = origin.x;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = previous {
                cursor += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(cursor, origin.y));
            cursor += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i64 + gx as i64;
                let y = bounds.min.y as i64 + gy as i64;
                ctx.blend_pixel(x, y, color, alpha * coverage);
            });
        }
        true
    }
}
