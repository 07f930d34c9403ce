//! Plugin system error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors that can occur while locating and reading plugin artifacts.
///
/// Structural problems found during validation are not errors; they are
/// collected as diagnostics on [`super::ValidationResult`].
#[derive(Debug, Error)]
pub enum PluginError {
    /// No candidate path exists.
    #[error("Not found: {0}")]
    NotFound(PathBuf),

    /// A directory was expected but the path is something else.
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    /// A path exists but could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest could not be parsed.
    #[error("Invalid manifest {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Plugin id is unusable as a file name.
    #[error("Invalid plugin id: '{0}'")]
    InvalidId(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PluginError {
    /// Build a `Read` error, folding `NotFound` io errors into [`PluginError::NotFound`].
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Read { path, source }
        }
    }

    /// Whether this error means "nothing there" rather than a real failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
