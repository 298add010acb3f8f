pub mod config;
pub mod context;
mod editor_state;
pub mod persistence;

pub use config::{CanvasConfig, GradientKind, PaintKind, ToolConfig};
pub use context::{EditorContext, StateTransitionError};
pub use editor_state::{EditorState, PanSession, ToolSession};
pub use persistence::{PersistenceError, PersistenceResult, Settings, load_settings, save_settings};
