use egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::view::ViewTransform;

/// Converts screen positions (egui points) into viewport buffer and content coordinates.
///
/// The canvas is displayed in `rect`, which may be scaled relative to the buffer it
/// shows. `scale` is buffer pixels per screen point on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    origin: Pos2,
    scale: Vec2,
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self { origin: Pos2::ZERO, scale: Vec2::splat(1.0) }
    }
}

impl CoordinateMapper {
    pub fn new(origin: Pos2, scale: Vec2) -> Self {
        Self { origin, scale }
    }

    /// Mapper for a buffer of `buffer_size` pixels shown in the on-screen `rect`.
    pub fn for_display(rect: Rect, buffer_size: Vec2) -> Self {
        let scale = if rect.width() > 0.0 && rect.height() > 0.0 {
            vec2(buffer_size.x / rect.width(), buffer_size.y / rect.height())
        } else {
            Vec2::splat(1.0)
        };
        Self { origin: rect.min, scale }
    }

    pub fn origin(&self) -> Pos2 {
        self.origin
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn to_buffer(&self, screen: Pos2) -> Pos2 {
        pos2((screen.x - self.origin.x) * self.scale.x, (screen.y - self.origin.y) * self.scale.y)
    }

    pub fn delta_to_buffer(&self, delta: Vec2) -> Vec2 {
        delta * self.scale
    }

    /// `((screen - origin) * scale - pan) / zoom`
    pub fn to_content(&self, screen: Pos2, view: &ViewTransform) -> Pos2 {
        view.to_content(self.to_buffer(screen))
    }

    /// Inverse of [`Self::to_content`].
    pub fn to_screen(&self, content: Pos2, view: &ViewTransform) -> Pos2 {
        let buffer = view.to_screen(content);
        pos2(buffer.x / self.scale.x + self.origin.x, buffer.y / self.scale.y + self.origin.y)
    }
}
