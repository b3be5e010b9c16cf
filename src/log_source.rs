//! LogSource: a configured log file bound to its tail settings.

use crate::config::{Config, Source};
use crate::format::human_filesize;
use crate::reader::{TailError, TailReader, TailRequest};
use std::path::{Path, PathBuf};

/// Named log file plus the request used to tail it.
#[derive(Debug, Clone)]
pub struct LogSource {
    name: String,
    reader: TailReader,
}

impl LogSource {
    pub fn new(name: impl Into<String>, path: impl AsRef<Path>, request: TailRequest) -> Self {
        Self {
            name: name.into(),
            reader: TailReader::new(path, request),
        }
    }

    /// Build from a config source, filling unset settings from `config`.
    pub fn from_config(config: &Config, source: &Source) -> Self {
        Self::new(&source.name, &source.path, config.request_for(source))
    }

    /// All sources in `config`, in config order.
    pub fn all(config: &Config) -> Vec<Self> {
        config
            .sources
            .iter()
            .map(|source| Self::from_config(config, source))
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        self.reader.path()
    }

    pub fn request(&self) -> TailRequest {
        self.reader.request()
    }

    /// Current trailing lines of the file.
    pub fn tail(&self) -> Result<Vec<String>, TailError> {
        self.reader.read()
    }

    /// Current file size, e.g. `"1.50MB"`.
    pub fn size_label(&self, decimals: usize) -> Result<String, TailError> {
        let metadata = std::fs::metadata(self.path())
            .map_err(|e| TailError::from_open(self.path(), e))?;
        if !metadata.is_file() {
            return Err(TailError::NotFound {
                path: PathBuf::from(self.path()),
            });
        }
        Ok(human_filesize(metadata.len(), decimals))
    }
}
