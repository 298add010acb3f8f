use std::io::Cursor;

use eframe::egui;
use egui::Color32;
use image::{ImageFormat, Rgba, RgbaImage};

use crate::command::Command;
use crate::error::FileError;
use crate::raster::{Composite, composite_pixel};

/// Default file name for exported drawings.
pub const EXPORT_FILE_NAME: &str = "drawing.png";

/// Decodes any format the `image` crate understands into RGBA.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, FileError> {
    let decoded = image::load_from_memory(bytes).map_err(FileError::Decode)?;
    log::debug!("decoded image: {}x{}", decoded.width(), decoded.height());
    Ok(decoded.to_rgba8())
}

/// The snapshot composited over an opaque background, as it appears on screen at 100%.
pub fn flatten(snapshot: &RgbaImage, background: Color32) -> RgbaImage {
    let [r, g, b, _] = background.to_srgba_unmultiplied();
    let mut out = RgbaImage::from_pixel(snapshot.width(), snapshot.height(), Rgba([r, g, b, 255]));
    for (dst, src) in out.pixels_mut().zip(snapshot.pixels()) {
        let [sr, sg, sb, sa] = src.0;
        dst.0 = composite_pixel(dst.0, [sr, sg, sb], sa as f32 / 255.0, Composite::SourceOver);
    }
    out
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, FileError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(FileError::Encode)?;
    Ok(bytes)
}

/// Writes exported bytes next to the working directory.
#[cfg(not(target_arch = "wasm32"))]
pub fn save_export(bytes: &[u8], path: impl AsRef<std::path::Path>) -> Result<(), FileError> {
    std::fs::write(path.as_ref(), bytes)?;
    log::info!("exported {} bytes to {}", bytes.len(), path.as_ref().display());
    Ok(())
}

/// Turns files dropped onto the window into import commands.
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process any newly dropped files from the UI context
    /// Returns true if any new files were picked up
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        ctx.input(|i| {
            if i.raw.dropped_files.is_empty() {
                false
            } else {
                self.dropped_files = i.raw.dropped_files.clone();
                true
            }
        })
    }

    /// Drains the dropped files and returns an import command for each readable image
    pub fn process_dropped_files(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        for file in std::mem::take(&mut self.dropped_files) {
            let file_name = display_name(&file);
            if !is_image_file(&file) {
                log::warn!("Dropped file is not a supported type: {}", file_name);
                continue;
            }
            if let Some(bytes) = read_bytes(&file, &file_name) {
                log::info!("Importing {} ({} bytes)", file_name, bytes.len());
                commands.push(Command::Import(bytes));
            }
        }
        commands
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }
        let text = ctx.input(|i| {
            let mut text = "Drop an image to open it:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            egui::TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let name = file.path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| file.name.clone());
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    matches!(ext.to_lowercase().as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp")
}

fn read_bytes(file: &egui::DroppedFile, file_name: &str) -> Option<Vec<u8>> {
    if let Some(bytes) = &file.bytes {
        return Some(bytes.to_vec());
    }

    #[cfg(not(target_arch = "wasm32"))]
    if let Some(path) = &file.path {
        return match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                log::error!("Failed to read image file: {}: {}", path.display(), err);
                None
            }
        };
    }

    log::warn!("Dropped file has no accessible data: {}", file_name);
    None
}
