use egui::{Color32, Vec2};
use image::{Rgba, RgbaImage};

use crate::raster::RasterContext;
use crate::state::CanvasConfig;

/// The drawing target, kept in content coordinates.
///
/// Every renderer paints into this raster. The background colour is baked in
/// when the surface is cleared; erasers cut through to transparency, which the
/// viewport and exporter show as background again.
#[derive(Debug, Clone)]
pub struct Surface {
    image: RgbaImage,
    background: Color32,
}

impl Surface {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            image: RgbaImage::from_pixel(config.width, config.height, background_pixel(config.background)),
            background: config.background,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn raster(&mut self) -> RasterContext<'_> {
        RasterContext::new(&mut self.image)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.width() && y < self.height()).then(|| *self.image.get_pixel(x, y))
    }

    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    /// Resizes to `config` and fills with its background.
    pub fn configure(&mut self, config: &CanvasConfig) {
        *self = Self::new(config);
    }

    /// Fills the whole raster with the background colour.
    pub fn clear(&mut self) {
        let fill = background_pixel(self.background);
        for pixel in self.image.pixels_mut() {
            *pixel = fill;
        }
    }

    /// A copy of the pixels, suitable for the history stack.
    pub fn snapshot(&self) -> RgbaImage {
        self.image.clone()
    }

    /// Replaces the pixels with `snapshot`, adopting its dimensions.
    pub fn restore(&mut self, snapshot: &RgbaImage) {
        if self.image.dimensions() == snapshot.dimensions() {
            self.image.copy_from_slice(snapshot.as_raw());
        } else {
            self.image = snapshot.clone();
        }
    }
}

pub fn background_pixel(color: Color32) -> Rgba<u8> {
    Rgba(color.to_srgba_unmultiplied())
}
