#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod error;
pub mod file_handler;
pub mod input;
pub mod panels;
pub mod raster;
pub mod renderer;
pub mod state;
pub mod surface;
pub mod symmetry;
pub mod tools;
pub mod view;

pub use app::PaintApp;
pub use command::{Command, CommandOutcome, SnapshotHistory};
pub use error::{CommandError, ConfigError, FileError};
pub use input::{CoordinateMapper, InputEvent, InputHandler};
pub use renderer::Renderer;
pub use state::{CanvasConfig, EditorContext, EditorState, ToolConfig};
pub use surface::Surface;
pub use symmetry::SymmetryMode;
pub use tools::ToolKind;
pub use view::ViewTransform;
