use egui::{Pos2, Vec2, pos2};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;
pub const ZOOM_SENSITIVITY: f32 = 0.1;

/// Maps content coordinates to viewport buffer coordinates: `buffer = content * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    zoom: f32,
    pan: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self { zoom: 1.0, pan: Vec2::ZERO }
    }
}

impl ViewTransform {
    /// A transform with the given zoom (clamped) and pan.
    pub fn new(zoom: f32, pan: Vec2) -> Self {
        Self { zoom: clamp_zoom(zoom), pan }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn to_screen(&self, content: Pos2) -> Pos2 {
        pos2(content.x * self.zoom + self.pan.x, content.y * self.zoom + self.pan.y)
    }

    pub fn to_content(&self, buffer: Pos2) -> Pos2 {
        pos2((buffer.x - self.pan.x) / self.zoom, (buffer.y - self.pan.y) / self.zoom)
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Scales the zoom by `factor` while keeping the content point under `anchor` in place.
    ///
    /// Zoom is clamped to `[MIN_ZOOM, MAX_ZOOM]`; at a bound the call still recenters
    /// around the anchor but the zoom does not move past the limit.
    pub fn zoom_at(&mut self, anchor: Pos2, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let pinned = self.to_content(anchor);
        self.zoom = clamp_zoom(self.zoom * factor);
        self.pan = anchor.to_vec2() - pinned.to_vec2() * self.zoom;
    }

    /// Visible content range for a viewport of `viewport` buffer pixels.
    pub fn visible_content(&self, viewport: Vec2) -> (Pos2, Pos2) {
        (self.to_content(Pos2::ZERO), self.to_content(viewport.to_pos2()))
    }
}

fn clamp_zoom(zoom: f32) -> f32 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
