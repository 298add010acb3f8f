use egui::{Pos2, Vec2, pos2};
use serde::{Deserialize, Serialize};

/// Axis symmetry applied to freehand strokes and stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SymmetryMode {
    #[default]
    None,
    /// Mirror across the horizontal centre line: `(x, y) -> (x, height - y)`.
    Horizontal,
    /// Mirror across the vertical centre line: `(x, y) -> (width - x, y)`.
    Vertical,
}

impl SymmetryMode {
    pub const ALL: [SymmetryMode; 3] = [SymmetryMode::None, SymmetryMode::Horizontal, SymmetryMode::Vertical];

    pub fn label(&self) -> &'static str {
        match self {
            SymmetryMode::None => "None",
            SymmetryMode::Horizontal => "Horizontal",
            SymmetryMode::Vertical => "Vertical",
        }
    }

    /// Runs `operation` at `point`, then once more at the mirrored point if a mode is active.
    ///
    /// The [`Reflection`] handed to each call lets multi-point primitives mirror their
    /// other defining points the same way.
    pub fn apply(&self, point: Pos2, content_size: Vec2, mut operation: impl FnMut(Pos2, Reflection)) {
        let identity = Reflection { mode: SymmetryMode::None, size: content_size };
        operation(point, identity);

        if *self != SymmetryMode::None {
            let mirror = Reflection { mode: *self, size: content_size };
            operation(mirror.reflect(point), mirror);
        }
    }
}

/// A single reflection over the content area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflection {
    mode: SymmetryMode,
    size: Vec2,
}

impl Reflection {
    pub fn is_identity(&self) -> bool {
        self.mode == SymmetryMode::None
    }

    pub fn reflect(&self, p: Pos2) -> Pos2 {
        match self.mode {
            SymmetryMode::None => p,
            SymmetryMode::Horizontal => pos2(p.x, self.size.y - p.y),
            SymmetryMode::Vertical => pos2(self.size.x - p.x, p.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    fn collect(mode: SymmetryMode, point: Pos2) -> Vec<Pos2> {
        let mut calls = Vec::new();
        mode.apply(point, vec2(800.0, 600.0), |p, _| calls.push(p));
        calls
    }

    #[test]
    fn test_none_calls_once() {
        assert_eq!(collect(SymmetryMode::None, pos2(10.0, 20.0)), vec![pos2(10.0, 20.0)]);
    }

    #[test]
    fn test_horizontal_mirrors_y() {
        assert_eq!(
            collect(SymmetryMode::Horizontal, pos2(10.0, 20.0)),
            vec![pos2(10.0, 20.0), pos2(10.0, 580.0)]
        );
    }

    #[test]
    fn test_vertical_mirrors_x() {
        assert_eq!(
            collect(SymmetryMode::Vertical, pos2(10.0, 20.0)),
            vec![pos2(10.0, 20.0), pos2(790.0, 20.0)]
        );
    }

    #[test]
    fn test_reflection_mirrors_other_points() {
        let mut previous = Vec::new();
        SymmetryMode::Vertical.apply(pos2(100.0, 50.0), vec2(800.0, 600.0), |_, r| {
            previous.push(r.reflect(pos2(90.0, 40.0)));
        });
        assert_eq!(previous, vec![pos2(90.0, 40.0), pos2(710.0, 40.0)]);
    }
}
