//! Config discovery for logtail.
//!
//! Walks parent directories to find `logtail.yaml` and checks for global config
//! at `<config_dir>/logtail/config.yaml`.

use std::path::{Path, PathBuf};

/// Project config filename to search for in parent directories.
pub const PROJECT_CONFIG_NAME: &str = "logtail.yaml";

/// Global config filename within the logtail config directory.
pub const GLOBAL_CONFIG_NAME: &str = "config.yaml";

/// Result of config discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryResult {
    /// Directory containing `logtail.yaml`.
    pub project_root: Option<PathBuf>,
    /// Full path to the project config file.
    pub project_config: Option<PathBuf>,
    /// Full path to the global config file.
    pub global_config: Option<PathBuf>,
}

impl DiscoveryResult {
    /// Returns true if any config was found (project or global).
    pub fn has_config(&self) -> bool {
        self.project_config.is_some() || self.global_config.is_some()
    }
}

/// Discover config files starting from the current working directory.
pub fn discover() -> DiscoveryResult {
    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.canonicalize().unwrap_or(dir),
        Err(_) => {
            return DiscoveryResult {
                global_config: global_config_path(),
                ..Default::default()
            }
        }
    };
    discover_from(&cwd)
}

/// Discover config files walking up from `start`.
pub fn discover_from(start: &Path) -> DiscoveryResult {
    let mut result = DiscoveryResult {
        global_config: global_config_path(),
        ..Default::default()
    };

    for ancestor in start.ancestors() {
        let config_path = ancestor.join(PROJECT_CONFIG_NAME);
        if config_path.is_file() {
            result.project_root = Some(ancestor.to_path_buf());
            result.project_config = Some(config_path);
            break;
        }
    }

    result
}

fn global_config_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("logtail").join(GLOBAL_CONFIG_NAME);
    path.is_file().then_some(path)
}
