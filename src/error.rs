//! Error types surfaced by a resolution call

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure of a single resolution call.
///
/// Either a malformed line in a config file (strict mode only) or a
/// non-parse failure such as I/O or an unusable target path.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed content in a config file, with its 1-based line number
    #[error("{}:{line}: malformed line", file.display())]
    Parse { file: PathBuf, line: usize },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl Error {
    pub(crate) fn parse(file: &Path, line: usize) -> Self {
        Error::Parse {
            file: file.to_path_buf(),
            line,
        }
    }

    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Error::Core(CoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub(crate) fn invalid_path(path: &Path, reason: &'static str) -> Self {
        Error::Core(CoreError::InvalidPath {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// The offending file and line, if this is a parse error.
    pub fn parse_location(&self) -> Option<(&Path, usize)> {
        match self {
            Error::Parse { file, line } => Some((file.as_path(), *line)),
            Error::Core(_) => None,
        }
    }
}

/// Non-parse failure: I/O or invalid target path
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid target path {}: {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: &'static str },
}

impl CoreError {
    /// Human-readable description of the failure.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
