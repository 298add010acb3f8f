use thiserror::Error;

/// Rejected canvas configuration. The previous canvas is left untouched.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("canvas {axis} must be a positive whole number, got `{value}`")]
    InvalidDimension { axis: &'static str, value: String },

    #[error("canvas {width}x{height} is too large")]
    TooLarge { width: u32, height: u32 },

    #[error("`{0}` is not a hex colour like #222222")]
    InvalidColor(String),
}

/// Failures while moving rasters in or out of the editor.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("could not decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("could not encode png: {0}")]
    Encode(#[source] image::ImageError),

    #[error("file io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("nothing to export, the history is empty")]
    EmptyCanvas,
}

/// Errors surfaced by [`crate::command::Command`] execution.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    File(#[from] FileError),
}

pub type CommandResult<T = ()> = Result<T, CommandError>;
