//! Software rasterization primitives shared by every stroke renderer.
//!
//! All drawing goes through [`RasterContext::paint_with`], which walks the pixels of a
//! bounding box, asks a shader for a colour and coverage, and composites the result into
//! the target image. Pixels are sampled at their centres, so a pixel at `(x, y)` covers
//! the content square `[x, x + 1) × [y, y + 1)`.

use egui::{Color32, Pos2, Rect, Vec2, pos2};
use image::RgbaImage;

/// How a painted source is combined with the pixels already in the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Composite {
    /// Standard "paint over" blending.
    #[default]
    SourceOver,
    /// Removes destination alpha proportionally to the source alpha.
    DestinationOut,
}

/// End cap for stroked segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
}

/// Everything needed to stroke a segment.
#[derive(Debug, Clone, Copy)]
pub struct Pen {
    pub width: f32,
    pub cap: LineCap,
    pub color: Color32,
    pub alpha: f32,
    /// Extra soft edge in pixels on top of the 1px anti-aliasing ramp.
    pub feather: f32,
    /// Hard-edged coverage with no anti-aliasing.
    pub aliased: bool,
}

impl Pen {
    pub fn new(width: f32, color: Color32, alpha: f32) -> Self {
        Self {
            width,
            cap: LineCap::Round,
            color,
            alpha,
            feather: 0.0,
            aliased: false,
        }
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_feather(mut self, feather: f32) -> Self {
        self.feather = feather.max(0.0);
        self
    }

    pub fn aliased(mut self) -> Self {
        self.aliased = true;
        self
    }

    fn coverage(&self, signed: f32) -> f32 {
        edge_coverage(signed, self.feather, self.aliased)
    }
}

/// Coverage for a sample `signed` pixels inside an edge (negative is outside).
pub fn edge_coverage(signed: f32, feather: f32, aliased: bool) -> f32 {
    if aliased {
        if signed >= 0.0 { 1.0 } else { 0.0 }
    } else {
        ((signed + 0.5) / (1.0 + feather)).clamp(0.0, 1.0)
    }
}

/// Unmultiplied rgb of a colour.
pub fn rgb(color: Color32) -> [u8; 3] {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    [r, g, b]
}

/// A drawing context borrowing a raster for the duration of one primitive.
pub struct RasterContext<'a> {
    image: &'a mut RgbaImage,
    composite: Composite,
}

impl<'a> RasterContext<'a> {
    pub fn new(image: &'a mut RgbaImage) -> Self {
        Self {
            image,
            composite: Composite::SourceOver,
        }
    }

    pub fn composite(&self) -> Composite {
        self.composite
    }

    pub fn set_composite(&mut self, composite: Composite) {
        self.composite = composite;
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.image.width() as f32, self.image.height() as f32)
    }

    pub fn image(&self) -> &RgbaImage {
        &*self.image
    }

    /// Composites `rgb` at `alpha` into a single pixel. Out-of-bounds writes are dropped.
    pub fn blend_pixel(&mut self, x: i64, y: i64, rgb: [u8; 3], alpha: f32) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        pixel.0 = composite_pixel(pixel.0, rgb, alpha, self.composite);
    }

    /// Runs `shader` for every pixel centre inside `bounds` and composites what it returns.
    pub fn paint_with(&mut self, bounds: Rect, mut shader: impl FnMut(Pos2) -> Option<([u8; 3], f32)>) {
        let Some((x0, y0, x1, y1)) = self.clip(bounds) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let center = pos2(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((rgb, alpha)) = shader(center) {
                    self.blend_pixel(x, y, rgb, alpha);
                }
            }
        }
    }

    /// Strokes the segment `from -> to`. A zero-length segment only leaves a mark with a round cap.
    pub fn stroke_segment(&mut self, from: Pos2, to: Pos2, pen: &Pen) {
        let radius = pen.width * 0.5;
        if radius <= 0.0 {
            return;
        }
        let axis = to - from;
        let length = axis.length();
        if length <= f32::EPSILON && pen.cap == LineCap::Butt {
            return;
        }
        let dir = if length > f32::EPSILON { axis / length } else { Vec2::X };
        let pad = radius + pen.feather + 1.0;
        let bounds = Rect::from_two_pos(from, to).expand(pad);
        let color = rgb(pen.color);
        let alpha = pen.alpha;

        self.paint_with(bounds, |p| {
            let rel = p - from;
            let along = rel.dot(dir);
            let signed = match pen.cap {
                LineCap::Round => {
                    let t = along.clamp(0.0, length);
                    radius - (rel - dir * t).length()
                }
                LineCap::Butt => {
                    let across = (rel - dir * along).length();
                    let beyond = (-along).max(along - length);
                    (radius - across).min(-beyond)
                }
            };
            let coverage = pen.coverage(signed);
            (coverage > 0.0).then_some((color, alpha * coverage))
        });
    }

    /// Strokes `from -> to` as alternating dashes and gaps of `dash` length.
    pub fn stroke_dashed(&mut self, from: Pos2, to: Pos2, dash: f32, pen: &Pen) {
        let axis = to - from;
        let length = axis.length();
        if length <= f32::EPSILON || dash <= 0.0 {
            return;
        }
        let dir = axis / length;
        let mut offset = 0.0;
        while offset < length {
            let end = (offset + dash).min(length);
            self.stroke_segment(from + dir * offset, from + dir * end, &pen.with_cap(LineCap::Butt));
            offset += dash * 2.0;
        }
    }

    /// Fills the pixels whose centres lie inside `rect`, without anti-aliasing.
    pub fn fill_cells(&mut self, rect: Rect, color: Color32, alpha: f32) {
        let color = rgb(color);
        self.paint_with(rect, |p| {
            let inside = p.x >= rect.min.x && p.x < rect.max.x && p.y >= rect.min.y && p.y < rect.max.y;
            inside.then_some((color, alpha))
        });
    }

    fn clip(&self, bounds: Rect) -> Option<(i64, i64, i64, i64)> {
        if !bounds.is_finite() {
            return None;
        }
        let x0 = (bounds.min.x.floor() as i64).max(0);
        let y0 = (bounds.min.y.floor() as i64).max(0);
        let x1 = (bounds.max.x.ceil() as i64).min(self.image.width() as i64);
        let y1 = (bounds.max.y.ceil() as i64).min(self.image.height() as i64);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

/// Straight-alpha compositing of one source sample onto a destination pixel.
pub fn composite_pixel(dst: [u8; 4], src: [u8; 3], alpha: f32, composite: Composite) -> [u8; 4] {
    let da = dst[3] as f32 / 255.0;
    match composite {
        Composite::SourceOver => {
            let out_a = alpha + da * (1.0 - alpha);
            if out_a <= 0.0 {
                return [0, 0, 0, 0];
            }
            let channel = |s: u8, d: u8| {
                let value = (s as f32 * alpha + d as f32 * da * (1.0 - alpha)) / out_a;
                value.round().clamp(0.0, 255.0) as u8
            };
            [
                channel(src[0], dst[0]),
                channel(src[1], dst[1]),
                channel(src[2], dst[2]),
                (out_a * 255.0).round() as u8,
            ]
        }
        Composite::DestinationOut => {
            let out_a = da * (1.0 - alpha);
            [dst[0], dst[1], dst[2], (out_a * 255.0).round() as u8]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_opaque_source_over_replaces_pixel() {
        let out = composite_pixel([10, 20, 30, 255], [200, 100, 50], 1.0, Composite::SourceOver);
        assert_eq!(out, [200, 100, 50, 255]);
    }

    #[test]
    fn test_half_alpha_blends_towards_source() {
        let out = composite_pixel([0, 0, 0, 255], [255, 255, 255], 0.5, Composite::SourceOver);
        assert_eq!(out[3], 255);
        assert!((126..=129).contains(&out[0]));
    }

    #[test]
    fn test_destination_out_clears_alpha() {
        let out = composite_pixel([10, 20, 30, 255], [0, 0, 0], 1.0, Composite::DestinationOut);
        assert_eq!(out[3], 0);

        let faded = composite_pixel([10, 20, 30, 255], [0, 0, 0], 0.2, Composite::DestinationOut);
        assert_eq!(faded[3], 204);
    }

    #[test]
    fn test_butt_cap_zero_length_draws_nothing() {
        let mut image = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let mut ctx = RasterContext::new(&mut image);
        let pen = Pen::new(4.0, Color32::WHITE, 1.0).with_cap(LineCap::Butt);
        ctx.stroke_segment(pos2(5.0, 5.0), pos2(5.0, 5.0), &pen);
        assert!(image.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn test_round_cap_zero_length_draws_dot() {
        let mut image = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let mut ctx = RasterContext::new(&mut image);
        let pen = Pen::new(4.0, Color32::WHITE, 1.0);
        ctx.stroke_segment(pos2(5.0, 5.0), pos2(5.0, 5.0), &pen);
        assert_eq!(image.get_pixel(5, 5).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_dashed_line_leaves_gaps() {
        let mut image = RgbaImage::from_pixel(40, 5, Rgba([0, 0, 0, 255]));
        let mut ctx = RasterContext::new(&mut image);
        let pen = Pen::new(2.0, Color32::WHITE, 1.0);
        ctx.stroke_dashed(pos2(0.0, 2.0), pos2(40.0, 2.0), 5.0, &pen);
        assert_eq!(image.get_pixel(2, 2).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(7, 2).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(12, 2).0, [255, 255, 255, 255]);
    }
}
