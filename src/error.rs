//! Crate-level error types.

use std::fmt;

/// Errors produced by the viscene crate.
#[derive(Debug)]
pub enum SceneError {
    /// A shader program failed to compile or link.
    ShaderLoad {
        /// Name of the shader stage (or program) that failed.
        name: String,
        /// Driver info log.
        log: String,
    },
    /// A text label was requested before the text subsystem was ready.
    TextUnavailable,
    /// A GL object (buffer, vertex array) could not be created.
    Gl(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// JSON serialization failure (snapshot, glTF).
    Json(serde_json::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Image encoding failure.
    ImageEncode(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShaderLoad { name, log } => {
                write!(f, "failed to load shader '{name}': {log}")
            }
            Self::TextUnavailable => {
                write!(f, "text shader program or font service not ready")
            }
            Self::Gl(msg) => write!(f, "GL error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::ImageEncode(msg) => write!(f, "image encode error: {msg}"),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
