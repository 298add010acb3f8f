//! Freehand renderers. Sizes are in screen pixels and divided by zoom so a brush
//! looks the same on screen at every zoom level.

use egui::{Rect, Vec2, pos2, vec2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::Stroke;
use crate::raster::{Composite, LineCap, Pen, RasterContext, rgb};
use crate::state::config::PaintKind;

const WATER_ALPHA: f32 = 0.3;
const WATER_PASSES: usize = 3;
const WATER_JITTER: f32 = 0.3;
const OIL_ALPHA: f32 = 0.9;
const OIL_WIDTH: f32 = 1.2;
const FOG_SPREAD: f32 = 3.0;
const FOG_ALPHA: f32 = 0.1;
const FOG_INNER: f32 = 0.05;
const FOG_OUTER: f32 = 0.5;
const FADE_ERASE_ALPHA: f32 = 0.2;

/// Pencil with variable hardness. Soft pencils get a round cap and a feathered edge.
pub fn pencil(ctx: &mut RasterContext<'_>, stroke: &Stroke) {
    let width = stroke.size / stroke.zoom;
    let cap = if stroke.hardness < 0.5 { LineCap::Round } else { LineCap::Butt };
    let feather = (1.0 - stroke.hardness).max(0.0) * width * 0.5;
    let pen = Pen::new(width, stroke.color, stroke.opacity).with_cap(cap).with_feather(feather);
    ctx.stroke_segment(stroke.previous, stroke.point, &pen);
}

/// Thin, hard-edged ink line at half the brush size.
pub fn ink_pencil(ctx: &mut RasterContext<'_>, stroke: &Stroke) {
    let width = (stroke.size / 2.0).max(1.0) / stroke.zoom;
    let pen = Pen::new(width, stroke.color, stroke.opacity).with_cap(LineCap::Butt).aliased();
    ctx.stroke_segment(stroke.previous, stroke.point, &pen);
}

pub fn paint_brush(ctx: &mut RasterContext<'_>, stroke: &Stroke) {
    let width = stroke.size / stroke.zoom;
    match stroke.paint {
        PaintKind::Water => {
            let pen = Pen::new(width, stroke.color, stroke.opacity * WATER_ALPHA);
            let mut rng = SmallRng::seed_from_u64(stroke.seed);
            for _ in 0..WATER_PASSES {
                let jitter = vec2(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * width * WATER_JITTER;
                ctx.stroke_segment(stroke.previous + jitter, stroke.point + jitter, &pen);
            }
        }
        PaintKind::Oil => {
            let pen = Pen::new(width * OIL_WIDTH, stroke.color, stroke.opacity * OIL_ALPHA);
            ctx.stroke_segment(stroke.previous, stroke.point, &pen);
        }
        PaintKind::Stark => {
            let pen = Pen::new(width, stroke.color, stroke.opacity);
            ctx.stroke_segment(stroke.previous, stroke.point, &pen);
        }
    }
}

/// Fills the grid cell under the point. No interpolation between points.
pub fn pixel_brush(ctx: &mut RasterContext<'_>, stroke: &Stroke) {
    let cell = (stroke.size / stroke.zoom).max(1.0);
    let min = pos2((stroke.point.x / cell).floor() * cell, (stroke.point.y / cell).floor() * cell);
    ctx.fill_cells(Rect::from_min_size(min, Vec2::splat(cell)), stroke.color, stroke.opacity);
}

/// Soft radial dab; ignores the previous point.
pub fn fog_pencil(ctx: &mut RasterContext<'_>, stroke: &Stroke) {
    let diameter = stroke.size * FOG_SPREAD / stroke.zoom;
    let inner = diameter * FOG_INNER;
    let outer = diameter * FOG_OUTER;
    if outer <= inner {
        return;
    }
    let center = stroke.point;
    let color = rgb(stroke.color);
    let alpha = stroke.opacity * FOG_ALPHA;

    ctx.paint_with(Rect::from_center_size(center, Vec2::splat(outer * 2.0 + 2.0)), |p| {
        let d = p.distance(center);
        let falloff = 1.0 - ((d - inner) / (outer - inner)).clamp(0.0, 1.0);
        (falloff > 0.0).then_some((color, alpha * falloff))
    });
}

pub fn eraser(ctx: &mut RasterContext<'_>, stroke: &Stroke) {
    erase(ctx, stroke, 1.0);
}

/// Partial erase, removing a fifth of the opacity per pass.
pub fn fade_eraser(ctx: &mut RasterContext<'_>, stroke: &Stroke) {
    erase(ctx, stroke, stroke.opacity * FADE_ERASE_ALPHA);
}

fn erase(ctx: &mut RasterContext<'_>, stroke: &Stroke, strength: f32) {
    let width = stroke.size / stroke.zoom;
    let pen = Pen::new(width, stroke.color, strength);
    let previous = ctx.composite();
    ctx.set_composite(Composite::DestinationOut);
    ctx.stroke_segment(stroke.previous, stroke.point, &pen);
    ctx.set_composite(previous);
}
