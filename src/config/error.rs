//! Config error types for logtail.

use std::fmt;
use std::path::{Path, PathBuf};

/// Error loading or parsing a config file.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid YAML or does not match the schema.
    Parse { path: PathBuf, message: String },

    /// Parsed, but a setting or source entry is not acceptable.
    Validation {
        path: PathBuf,
        message: String,
        /// Source entry the problem belongs to, if any.
        entry: Option<String>,
    },
}

impl ConfigError {
    pub fn from_saphyr_error(path: PathBuf, err: impl fmt::Display) -> Self {
        ConfigError::Parse {
            path,
            message: err.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Io { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Validation { path, .. } => path,
        }
    }

    fn headline(&self) -> String {
        match self {
            ConfigError::Io { .. } => "cannot read logtail config".to_string(),
            ConfigError::Parse { .. } => "invalid logtail config".to_string(),
            ConfigError::Validation { message, .. } => message.clone(),
        }
    }

    fn note(&self) -> Option<String> {
        match self {
            ConfigError::Io { source, .. } => Some(source.to_string()),
            // saphyr messages already carry line and column
            ConfigError::Parse { message, .. } => Some(message.clone()),
            ConfigError::Validation { entry, .. } => {
                entry.as_ref().map(|name| format!("in source `{}`", name))
            }
        }
    }
}

/// Rendered as `error: <headline>`, the file, then an optional `= note:` line.
impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.headline())?;
        write!(f, "  --> {}", self.path().display())?;
        if let Some(note) = self.note() {
            write!(f, "\n  = note: {}", note)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
