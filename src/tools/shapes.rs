//! Two-point primitives: line, rectangle, ellipse and gradient fills.

use egui::{Color32, Pos2, Rect, Vec2, vec2};

use crate::raster::{LineCap, Pen, RasterContext, edge_coverage, rgb};
use crate::state::config::{GradientKind, ToolConfig};

const GUIDE_COLOR: Color32 = Color32::from_rgb(200, 200, 200);
const GUIDE_ALPHA: f32 = 0.7;
const GUIDE_WIDTH: f32 = 2.0;
const GUIDE_DASH: f32 = 5.0;
const RADIAL_INNER: f32 = 0.1;

/// How shape outlines and fills are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub filled: bool,
    /// Outline width in content pixels.
    pub stroke_width: f32,
    pub color: Color32,
    pub alpha: f32,
}

impl ShapeStyle {
    /// The style for the current settings; the outline width is divided by zoom.
    pub fn from_config(config: &ToolConfig, zoom: f32) -> Self {
        Self {
            filled: config.fill_shapes,
            stroke_width: config.shape_stroke_width / zoom,
            color: config.primary,
            alpha: config.opacity,
        }
    }

    fn pen(&self) -> Pen {
        Pen::new(self.stroke_width, self.color, self.alpha)
    }
}

pub fn line(ctx: &mut RasterContext<'_>, from: Pos2, to: Pos2, style: &ShapeStyle) {
    ctx.stroke_segment(from, to, &style.pen().with_cap(LineCap::Butt));
}

/// Axis-aligned rectangle spanned by two corners.
pub fn rectangle(ctx: &mut RasterContext<'_>, corner: Pos2, opposite: Pos2, style: &ShapeStyle) {
    let rect = Rect::from_two_pos(corner, opposite);
    let center = rect.center();
    let half = rect.size() * 0.5;
    let color = rgb(style.color);
    let pad = style.stroke_width + 2.0;

    let filled = style.filled;
    let half_width = style.stroke_width * 0.5;
    ctx.paint_with(rect.expand(pad), |p| {
        let distance = box_distance(p - center, half);
        let signed = if filled { -distance } else { half_width - distance.abs() };
        let coverage = edge_coverage(signed, 0.0, false);
        (coverage > 0.0).then_some((color, style.alpha * coverage))
    });
}

/// Ellipse around `center` with the given radii.
pub fn ellipse(ctx: &mut RasterContext<'_>, center: Pos2, radii: Vec2, style: &ShapeStyle) {
    if radii.x <= 0.0 || radii.y <= 0.0 {
        return;
    }
    let color = rgb(style.color);
    let pad = style.stroke_width + 2.0;
    let filled = style.filled;
    let half_width = style.stroke_width * 0.5;
    let bounds = Rect::from_center_size(center, radii * 2.0).expand(pad);

    ctx.paint_with(bounds, |p| {
        let distance = ellipse_distance(p - center, radii);
        let signed = if filled { -distance } else { half_width - distance.abs() };
        let coverage = edge_coverage(signed, 0.0, false);
        (coverage > 0.0).then_some((color, style.alpha * coverage))
    });
}

/// Covers the whole raster with a two-colour gradient defined by a drag.
///
/// Linear gradients span the full canvas along the dominant drag axis, with the colours
/// swapped when the drag runs backwards. Radial gradients are centred on `start`.
pub fn gradient(
    ctx: &mut RasterContext<'_>,
    start: Pos2,
    end: Pos2,
    kind: GradientKind,
    colors: (Color32, Color32),
    alpha: f32,
) {
    let size = ctx.size();
    let delta = end - start;
    let (first, second) = (rgb(colors.0), rgb(colors.1));

    let ramp: Box<dyn Fn(Pos2) -> f32> = match kind {
        GradientKind::Linear => {
            let horizontal = delta.x.abs() > delta.y.abs();
            let reversed = if horizontal { delta.x < 0.0 } else { delta.y < 0.0 };
            Box::new(move |p: Pos2| {
                let t = if horizontal { p.x / size.x } else { p.y / size.y };
                if reversed { 1.0 - t } else { t }
            })
        }
        GradientKind::Radial => {
            let outer = delta.length();
            if outer <= f32::EPSILON {
                return;
            }
            let inner = outer * RADIAL_INNER;
            Box::new(move |p: Pos2| (p.distance(start) - inner) / (outer - inner))
        }
    };

    let bounds = Rect::from_min_size(Pos2::ZERO, size);
    ctx.paint_with(bounds, |p| {
        let t = ramp(p).clamp(0.0, 1.0);
        Some((lerp_rgb(first, second, t), alpha))
    });
}

/// Dashed drag guide shown while a gradient is being defined.
pub fn gradient_guide(ctx: &mut RasterContext<'_>, start: Pos2, end: Pos2, zoom: f32) {
    let pen = Pen::new(GUIDE_WIDTH / zoom, GUIDE_COLOR, GUIDE_ALPHA);
    ctx.stroke_dashed(start, end, GUIDE_DASH / zoom, &pen);
}

fn lerp_rgb(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

/// Signed distance from `p` (relative to the centre) to a box with half extents `half`.
fn box_distance(p: Vec2, half: Vec2) -> f32 {
    let q = vec2(p.x.abs() - half.x, p.y.abs() - half.y);
    let outside = vec2(q.x.max(0.0), q.y.max(0.0)).length();
    outside + q.x.max(q.y).min(0.0)
}

/// Approximate signed distance to an ellipse outline, exact for circles.
fn ellipse_distance(p: Vec2, radii: Vec2) -> f32 {
    let normalized = vec2(p.x / radii.x, p.y / radii.y).length();
    (normalized - 1.0) * radii.x.min(radii.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_distance_sign() {
        let half = vec2(10.0, 5.0);
        assert!(box_distance(vec2(0.0, 0.0), half) < 0.0);
        assert_eq!(box_distance(vec2(12.0, 0.0), half), 2.0);
        assert_eq!(box_distance(vec2(10.0, 0.0), half), 0.0);
    }

    #[test]
    fn test_circle_distance_is_exact() {
        assert!((ellipse_distance(vec2(3.0, 4.0), vec2(10.0, 10.0)) + 5.0).abs() < 1e-4);
    }
}
