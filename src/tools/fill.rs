use egui::{Color32, Pos2};
use image::{Rgba, RgbaImage};

/// Fill colour for the current settings: primary rgb with alpha `floor(opacity * 255)`.
pub fn fill_color(primary: Color32, opacity: f32) -> Rgba<u8> {
    let [r, g, b, _] = primary.to_srgba_unmultiplied();
    Rgba([r, g, b, (opacity.clamp(0.0, 1.0) * 255.0).floor() as u8])
}

/// Replaces the 4-connected region of exactly matching pixels around `seed` with `fill`.
///
/// Returns the number of pixels changed. Seeds outside the raster, or on a pixel that
/// already has the fill colour, change nothing.
pub fn flood_fill(image: &mut RgbaImage, seed: Pos2, fill: Rgba<u8>) -> usize {
    let (width, height) = image.dimensions();
    let (sx, sy) = (seed.x.floor(), seed.y.floor());
    if sx < 0.0 || sy < 0.0 || sx >= width as f32 || sy >= height as f32 {
        return 0;
    }
    let (sx, sy) = (sx as u32, sy as u32);
    let target = *image.get_pixel(sx, sy);
    if target == fill {
        return 0;
    }

    let w = width as usize;
    let h = height as usize;
    let mut visited = vec![false; w * h];
    // Packed `y * width + x` indices.
    let mut stack: Vec<u32> = Vec::with_capacity(4096);
    let seed_index = sy as usize * w + sx as usize;
    visited[seed_index] = true;
    stack.push(seed_index as u32);

    let mut changed = 0;
    while let Some(index) = stack.pop() {
        let index = index as usize;
        let (x, y) = (index % w, index / w);
        image.put_pixel(x as u32, y as u32, fill);
        changed += 1;

        let mut visit = |next: usize, image: &RgbaImage| {
            if !visited[next] && *image.get_pixel((next % w) as u32, (next / w) as u32) == target {
                visited[next] = true;
                stack.push(next as u32);
            }
        };
        if x > 0 {
            visit(index - 1, image);
        }
        if x + 1 < w {
            visit(index + 1, image);
        }
        if y > 0 {
            visit(index - w, image);
        }
        if y + 1 < h {
            visit(index + w, image);
        }
    }
    changed
}

/// The pixel under `point`, if it lies on the raster.
pub fn sample_color(image: &RgbaImage, point: Pos2) -> Option<Rgba<u8>> {
    let (x, y) = (point.x.floor(), point.y.floor());
    if x < 0.0 || y < 0.0 || x >= image.width() as f32 || y >= image.height() as f32 {
        return None;
    }
    Some(*image.get_pixel(x as u32, y as u32))
}
