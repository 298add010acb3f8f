// src/renderer.rs
use eframe::egui::{self, Color32, Rect, Vec2, pos2, vec2};
use image::{Rgba, RgbaImage};

use crate::raster::{LineCap, Pen, RasterContext};
use crate::surface::Surface;
use crate::symmetry::SymmetryMode;
use crate::view::ViewTransform;

/// Grid spacing in content units.
pub const GRID_SIZE: f32 = 20.0;
const GRID_COLOR: Color32 = Color32::from_rgb(204, 204, 204);
const GRID_ALPHA: f32 = 0.15;
/// Grid and guide widths are in screen pixels; the content width is this divided by zoom.
const GRID_LINE_WIDTH: f32 = 0.5;
const GUIDE_COLOR: Color32 = Color32::from_rgb(150, 150, 255);
const GUIDE_ALPHA: f32 = 0.5 * 0.5;
const GUIDE_LINE_WIDTH: f32 = 1.0;
const GUIDE_DASH: f32 = 5.0;

/// Produces the on-screen viewport from the surface, the view transform and overlays.
#[derive(Default)]
pub struct Renderer {
    viewport: RgbaImage,
    show_grid: bool,
    texture: Option<egui::TextureHandle>,
    dirty: bool,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("viewport", &self.viewport.dimensions())
            .field("show_grid", &self.show_grid)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: RgbaImage::new(width, height),
            show_grid: false,
            texture: None,
            dirty: true,
        }
    }

    /// The last repainted viewport buffer.
    pub fn viewport(&self) -> &RgbaImage {
        &self.viewport
    }

    pub fn viewport_size(&self) -> Vec2 {
        vec2(self.viewport.width() as f32, self.viewport.height() as f32)
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.show_grid = show;
    }

    /// Redraws the whole viewport.
    ///
    /// Args:
    ///     surface: The content raster, drawn nearest-neighbour through `view`
    ///     view: Current zoom and pan
    ///     symmetry: Active mode, whose axis is drawn as a dashed guide
    pub fn repaint(&mut self, surface: &Surface, view: &ViewTransform, symmetry: SymmetryMode) {
        if self.viewport.dimensions() != surface.image().dimensions() {
            self.viewport = RgbaImage::new(surface.width(), surface.height());
        }

        let background = surface.background().to_srgba_unmultiplied();
        let content = surface.image();
        let (width, height) = self.viewport.dimensions();

        // Column lookups are shared by every row.
        let columns: Vec<Option<u32>> = (0..width)
            .map(|x| content_index(x, view.pan().x, view.zoom(), content.width()))
            .collect();

        for y in 0..height {
            let row = content_index(y, view.pan().y, view.zoom(), content.height());
            for (x, column) in columns.iter().enumerate() {
                let sample = match (*column, row) {
                    (Some(cx), Some(cy)) => over_background(content.get_pixel(cx, cy).0, background),
                    _ => background,
                };
                self.viewport.put_pixel(x as u32, y, Rgba(sample));
            }
        }

        if self.show_grid {
            self.draw_grid(view);
        }
        self.draw_symmetry_guide(surface, view, symmetry);
        self.dirty = true;
    }

    fn draw_grid(&mut self, view: &ViewTransform) {
        let size = self.viewport_size();
        let (start, end) = view.visible_content(size);
        let pen = Pen::new(GRID_LINE_WIDTH, GRID_COLOR, GRID_ALPHA).with_cap(LineCap::Butt);
        let mut raster = RasterContext::new(&mut self.viewport);

        // Only the lines inside the visible content range are drawn.
        let first_x = (start.x / GRID_SIZE).floor() as i64;
        let last_x = (end.x / GRID_SIZE).ceil() as i64;
        for k in first_x..=last_x {
            let x = view.to_screen(pos2(k as f32 * GRID_SIZE, 0.0)).x;
            raster.stroke_segment(pos2(x, 0.0), pos2(x, size.y), &pen);
        }

        let first_y = (start.y / GRID_SIZE).floor() as i64;
        let last_y = (end.y / GRID_SIZE).ceil() as i64;
        for k in first_y..=last_y {
            let y = view.to_screen(pos2(0.0, k as f32 * GRID_SIZE)).y;
            raster.stroke_segment(pos2(0.0, y), pos2(size.x, y), &pen);
        }
    }

    fn draw_symmetry_guide(&mut self, surface: &Surface, view: &ViewTransform, symmetry: SymmetryMode) {
        let content = surface.size();
        let (from, to) = match symmetry {
            SymmetryMode::None => return,
            SymmetryMode::Horizontal => (pos2(0.0, content.y / 2.0), pos2(content.x, content.y / 2.0)),
            SymmetryMode::Vertical => (pos2(content.x / 2.0, 0.0), pos2(content.x / 2.0, content.y)),
        };
        let pen = Pen::new(GUIDE_LINE_WIDTH, GUIDE_COLOR, GUIDE_ALPHA);
        let mut raster = RasterContext::new(&mut self.viewport);
        raster.stroke_dashed(view.to_screen(from), view.to_screen(to), GUIDE_DASH, &pen);
    }

    /// Uploads the viewport if it changed and paints it into `rect`.
    ///
    /// Args:
    ///     ctx (egui::Context): The egui context for the current frame
    ///     painter (egui::Painter): The painter to draw with
    ///     rect (egui::Rect): The on-screen rectangle the viewport buffer is stretched over
    pub fn render(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: Rect) {
        if self.dirty || self.texture.is_none() {
            let size = [self.viewport.width() as usize, self.viewport.height() as usize];
            let image = egui::ColorImage::from_rgba_unmultiplied(size, self.viewport.as_raw());
            match &mut self.texture {
                Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
                None => {
                    self.texture = Some(ctx.load_texture("canvas_viewport", image, egui::TextureOptions::NEAREST));
                }
            }
            self.dirty = false;
        }

        if let Some(texture) = &self.texture {
            let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
            painter.image(texture.id(), rect, uv, Color32::WHITE);
        }
    }
}

/// Content pixel sampled by buffer pixel `i` along one axis, if it lands on the content.
fn content_index(i: u32, pan: f32, zoom: f32, extent: u32) -> Option<u32> {
    let c = ((i as f32 + 0.5 - pan) / zoom).floor();
    (c >= 0.0 && c < extent as f32).then_some(c as u32)
}

fn over_background(src: [u8; 4], background: [u8; 4]) -> [u8; 4] {
    if src[3] == 255 {
        return src;
    }
    let a = src[3] as f32 / 255.0;
    let mix = |s: u8, b: u8| (s as f32 * a + b as f32 * (1.0 - a)).round() as u8;
    [mix(src[0], background[0]), mix(src[1], background[1]), mix(src[2], background[2]), 255]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CanvasConfig;

    fn surface(width: u32, height: u32) -> Surface {
        Surface::new(&CanvasConfig::new(width, height, Color32::from_rgb(0x22, 0x22, 0x22)).unwrap())
    }

    #[test]
    fn test_identity_repaint_copies_surface() {
        let mut surface = surface(40, 30);
        surface.pixels_mut().put_pixel(3, 4, Rgba([255, 0, 0, 255]));
        let mut renderer = Renderer::new(40, 30);
        renderer.repaint(&surface, &ViewTransform::default(), SymmetryMode::None);
        assert_eq!(renderer.viewport(), surface.image());
    }

    #[test]
    fn test_erased_pixels_show_background() {
        let mut surface = surface(10, 10);
        surface.pixels_mut().put_pixel(1, 1, Rgba([255, 255, 255, 0]));
        let mut renderer = Renderer::new(10, 10);
        renderer.repaint(&surface, &ViewTransform::default(), SymmetryMode::None);
        assert_eq!(renderer.viewport().get_pixel(1, 1).0, [0x22, 0x22, 0x22, 255]);
    }

    #[test]
    fn test_zoomed_repaint_scales_pixels() {
        let mut surface = surface(10, 10);
        surface.pixels_mut().put_pixel(1, 1, Rgba([255, 0, 0, 255]));
        let mut renderer = Renderer::new(10, 10);
        renderer.repaint(&surface, &ViewTransform::new(2.0, Vec2::ZERO), SymmetryMode::None);
        for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3)] {
            assert_eq!(renderer.viewport().get_pixel(x, y).0, [255, 0, 0, 255]);
        }
        assert_eq!(renderer.viewport().get_pixel(4, 4).0, [0x22, 0x22, 0x22, 255]);
    }

    #[test]
    fn test_grid_only_when_enabled() {
        let surface = surface(50, 50);
        let mut renderer = Renderer::new(50, 50);
        renderer.repaint(&surface, &ViewTransform::default(), SymmetryMode::None);
        let plain = renderer.viewport().clone();

        renderer.set_show_grid(true);
        renderer.repaint(&surface, &ViewTransform::default(), SymmetryMode::None);
        assert_ne!(renderer.viewport(), &plain);
        // Halfway between grid lines stays untouched.
        assert_eq!(renderer.viewport().get_pixel(10, 10), plain.get_pixel(10, 10));
    }

    #[test]
    fn test_symmetry_guide_drawn_on_axis() {
        let surface = surface(40, 40);
        let mut renderer = Renderer::new(40, 40);
        renderer.repaint(&surface, &ViewTransform::default(), SymmetryMode::Vertical);
        assert_ne!(renderer.viewport().get_pixel(19, 1).0, [0x22, 0x22, 0x22, 255]);
        assert_eq!(renderer.viewport().get_pixel(5, 1).0, [0x22, 0x22, 0x22, 255]);
    }
}
