/// The interaction state machine for the paint editor.
///
/// Every pointer or touch gesture moves the editor through these states. The
/// machine is strict: a gesture always returns to `Idle` before another can
/// begin, so a stroke can never be interrupted by a pan halfway through.
///
/// # State Transitions
///
/// ```text
///                    ┌─────────────┐
///              ┌─────►   Drawing   ├─────┐   gesture end: durable commit
///              │     └─────────────┘     │
///              │     ┌─────────────┐     │
/// ┌──────────┐ ├─────►  Previewing ├─────┤   gesture end: final shape + commit
/// │   Idle   │ │     └─────────────┘     │ ┌──────────┐
/// │          │ │     ┌─────────────┐     ├─►   Idle   │
/// └──────────┘ └─────►   Panning   ├─────┘ └──────────┘
///                    └─────────────┘
/// ```
///
/// Point tools (eyedropper, fill, text) act on gesture start and never leave `Idle`.
use egui::Pos2;

use crate::tools::ToolKind;

/// Per-gesture data for drawing and shape tools. Lives only as long as the gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSession {
    pub tool: ToolKind,
    /// Content point where the gesture began
    pub start: Pos2,
    /// Content point of the previous renderer call
    pub last: Pos2,
}

impl ToolSession {
    pub fn new(tool: ToolKind, start: Pos2) -> Self {
        Self { tool, start, last: start }
    }
}

/// Per-gesture data while panning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanSession {
    /// Screen position of the tracked pointer or first touch
    pub last: Pos2,
    /// Distance between the first two touches, when pinching
    pub pinch_distance: Option<f32>,
}

/// The possible states of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EditorState {
    /// No active gesture
    #[default]
    Idle,
    /// A continuous tool is painting on every move
    Drawing { session: ToolSession },
    /// Moving the view
    Panning { pan: PanSession },
    /// A shape tool is showing a live preview over a temporary baseline
    Previewing { session: ToolSession },
}

impl EditorState {
    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &EditorState) -> bool {
        match (self, new_state) {
            // From Idle, we can start any gesture
            (EditorState::Idle, _) => true,

            // Every gesture ends by going back to Idle
            (EditorState::Drawing { .. }, EditorState::Idle) => true,
            (EditorState::Panning { .. }, EditorState::Idle) => true,
            (EditorState::Previewing { .. }, EditorState::Idle) => true,

            // Updating the session of the gesture in progress
            (EditorState::Drawing { .. }, EditorState::Drawing { .. }) => true,
            (EditorState::Panning { .. }, EditorState::Panning { .. }) => true,
            (EditorState::Previewing { .. }, EditorState::Previewing { .. }) => true,

            _ => false,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, EditorState::Drawing { .. })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, EditorState::Panning { .. })
    }

    pub fn is_previewing(&self) -> bool {
        matches!(self, EditorState::Previewing { .. })
    }

    /// Returns the tool session if drawing or previewing
    pub fn session(&self) -> Option<&ToolSession> {
        match self {
            EditorState::Drawing { session } | EditorState::Previewing { session } => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut ToolSession> {
        match self {
            EditorState::Drawing { session } | EditorState::Previewing { session } => Some(session),
            _ => None,
        }
    }

    pub fn pan_session_mut(&mut self) -> Option<&mut PanSession> {
        match self {
            EditorState::Panning { pan } => Some(pan),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "idle",
            EditorState::Drawing { .. } => "drawing",
            EditorState::Panning { .. } => "panning",
            EditorState::Previewing { .. } => "previewing",
        }
    }
}
