use crate::state::CanvasConfig;
use crate::symmetry::SymmetryMode;
use crate::tools::ToolKind;

/// Editor-level actions triggered from menus, buttons or keyboard shortcuts.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    ToggleGrid,
    SetSymmetry(SymmetryMode),
    SetTool(ToolKind),
    /// Resize to a validated config, clearing history and view
    NewCanvas(CanvasConfig),
    /// Back to the default 800×600 canvas
    ResetCanvas,
    /// Fill with the background and record an undo step
    ClearCanvas,
    /// Load an encoded image (png, jpeg, gif, webp, bmp) as the new canvas
    Import(Vec<u8>),
    /// Encode the current drawing as png
    Export,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Undo => "undo",
            Command::Redo => "redo",
            Command::ZoomIn => "zoom in",
            Command::ZoomOut => "zoom out",
            Command::ResetZoom => "reset zoom",
            Command::ToggleGrid => "toggle grid",
            Command::SetSymmetry(_) => "set symmetry",
            Command::SetTool(_) => "set tool",
            Command::NewCanvas(_) => "new canvas",
            Command::ResetCanvas => "reset canvas",
            Command::ClearCanvas => "clear canvas",
            Command::Import(_) => "import",
            Command::Export => "export",
        }
    }
}

/// What running a command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Done,
    /// Nothing to do, e.g. undo with no earlier snapshot
    Ignored,
    /// PNG bytes from [`Command::Export`]
    Exported(Vec<u8>),
}
