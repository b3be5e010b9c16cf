//! Error type for tail reads.

use std::io;
use std::path::{Path, PathBuf};

/// Failure while reading the tail of a log file.
///
/// `NotFound` is the recoverable "no such log" outcome and is kept separate
/// from an empty file, which is a successful read of zero lines.
#[derive(Debug, thiserror::Error)]
pub enum TailError {
    /// The path does not exist, is not a regular file, or cannot be opened.
    #[error("log file not found or not readable: {}", path.display())]
    NotFound { path: PathBuf },

    /// Seek or read failed after the file was opened.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TailError {
    /// Classify an open/metadata error for `path`.
    pub(crate) fn from_open(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => TailError::NotFound {
                path: path.to_path_buf(),
            },
            _ => TailError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        TailError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns true for the "no such log" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TailError::NotFound { .. })
    }

    /// Path the failed read was aimed at.
    pub fn path(&self) -> &Path {
        match self {
            TailError::NotFound { path } | TailError::Io { path, .. } => path,
        }
    }
}
