use thiserror::Error;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Required file not found: {path:?}")]
    FileNotFound { path: PathBuf },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed message at index {index}: {raw}")]
    MalformedMessage { index: usize, raw: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

// Type alias for Result
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error conversions
impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn render<S: Into<String>>(msg: S) -> Self {
        Error::Render(msg.into())
    }

    pub fn font<S: Into<String>>(msg: S) -> Self {
        Error::Font(msg.into())
    }

    pub fn malformed(index: usize, raw: &serde_json::Value) -> Self {
        Error::MalformedMessage {
            index,
            raw: raw.to_string(),
        }
    }

    /// Maps a `NotFound` I/O error onto `FileNotFound` for the given path.
    pub fn from_io_at<P: Into<PathBuf>>(err: io::Error, path: P) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Error::FileNotFound { path: path.into() }
        } else {
            Error::Io(err)
        }
    }
}

