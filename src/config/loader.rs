//! Config loading for logtail.
//!
//! Loads and validates YAML config files with path expansion.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use tracing::debug;

use crate::config::discovery::DiscoveryResult;
use crate::config::error::ConfigError;
use crate::config::types::{Config, RawConfig, RawSource, Source, MAX_MAINT_LEAD_SECS};

/// Expand tilde in path to home directory.
///
/// - `~/foo` -> `/home/user/foo`
/// - `/absolute/path` -> unchanged
/// - `relative/path` -> unchanged
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();

    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path_str == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }

    path.to_path_buf()
}

/// Load and parse a YAML config file.
fn load_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let raw: RawConfig = serde_saphyr::from_str(&content)
        .map_err(|e| ConfigError::from_saphyr_error(path.to_path_buf(), e))?;

    validate(path, &raw)?;
    debug!(path = %path.display(), sources = raw.sources.len(), "loaded config file");
    Ok(raw)
}

/// Semantic checks that serde cannot express.
fn validate(path: &Path, raw: &RawConfig) -> Result<(), ConfigError> {
    let invalid = |message: String, entry: Option<String>| ConfigError::Validation {
        path: path.to_path_buf(),
        message,
        entry,
    };

    if let Some(secs) = raw.maint_lead_secs {
        if secs > MAX_MAINT_LEAD_SECS {
            return Err(invalid(
                format!(
                    "maint_lead_secs must be at most {}, got {}",
                    MAX_MAINT_LEAD_SECS, secs
                ),
                None,
            ));
        }
    }

    let mut seen = HashSet::new();
    for (i, source) in raw.sources.iter().enumerate() {
        if source.name.trim().is_empty() {
            return Err(invalid(
                "source name must not be empty".to_string(),
                Some(format!("#{}", i + 1)),
            ));
        }
        if !seen.insert(source.name.as_str()) {
            return Err(invalid(
                "duplicate source name".to_string(),
                Some(source.name.clone()),
            ));
        }
    }

    Ok(())
}

/// Expand paths in raw sources.
fn validate_sources(raw: Vec<RawSource>) -> Vec<Source> {
    raw.into_iter()
        .map(|raw_source| Source {
            name: raw_source.name,
            path: expand_path(&raw_source.path),
            lines: raw_source.lines,
            adaptive: raw_source.adaptive,
        })
        .collect()
}

/// Apply the scalar settings of `raw` on top of `config`.
fn apply(config: &mut Config, raw: &RawConfig) {
    if let Some(lines) = raw.lines {
        config.lines = lines;
    }
    if let Some(adaptive) = raw.adaptive {
        config.adaptive = adaptive;
    }
    // Bounded by `validate`, so the conversion cannot overflow
    if let Some(secs) = raw.maint_lead_secs {
        config.maint_lead = Duration::seconds(secs as i64);
    }
}

/// Load a single config file on top of the defaults.
pub fn load_single_file(path: &Path) -> Result<Config, ConfigError> {
    let raw = load_file(path)?;
    let mut config = Config::default();
    apply(&mut config, &raw);
    config.sources = validate_sources(raw.sources);
    Ok(config)
}

/// Load config from discovered config files.
///
/// Project settings override global ones. Sources from both files are kept,
/// project sources first; a project source shadows a global source with the
/// same name.
///
/// Returns the default Config if no config files exist.
pub fn load(discovery: &DiscoveryResult) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    let mut global_sources = Vec::new();

    // Global first so the project can override
    if let Some(global_path) = &discovery.global_config {
        let raw = load_file(global_path)?;
        apply(&mut config, &raw);
        global_sources = validate_sources(raw.sources);
    }

    if let Some(project_path) = &discovery.project_config {
        let raw = load_file(project_path)?;
        apply(&mut config, &raw);
        config.sources = validate_sources(raw.sources);
    }

    for source in global_sources {
        if config.source(&source.name).is_none() {
            config.sources.push(source);
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{TailRequest, DEFAULT_LINE_COUNT};
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_expand_path_tilde() {
        let expanded = expand_path(Path::new("~/logs/cacti.log"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("logs/cacti.log"));
        } else {
            assert_eq!(expanded.to_string_lossy(), "~/logs/cacti.log");
        }
    }

    #[test]
    fn test_expand_path_absolute() {
        let expanded = expand_path(Path::new("/var/log/cacti.log"));
        assert_eq!(expanded, PathBuf::from("/var/log/cacti.log"));
    }

    #[test]
    fn test_expand_path_relative() {
        let expanded = expand_path(Path::new("log/cacti.log"));
        assert_eq!(expanded, PathBuf::from("log/cacti.log"));
    }

    #[test]
    fn test_load_empty_discovery() {
        let config = load(&DiscoveryResult::default()).unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.has_sources());
    }

    #[test]
    fn test_load_single_file() {
        let temp = TempDir::new().unwrap();
        let log_path = write(&temp, "cacti.log", "line\n");
        let config_path = write(
            &temp,
            "logtail.yaml",
            &format!(
                r#"
lines: 200
maint_lead_secs: 3600
sources:
  - name: cacti
    path: {}
  - name: stderr
    path: /nonexistent/cacti_stderr.log
    lines: 20
    adaptive: false
"#,
                log_path.display()
            ),
        );

        let config = load_single_file(&config_path).unwrap();

        assert_eq!(config.lines, 200);
        assert!(config.adaptive);
        assert_eq!(config.maint_lead, Duration::hours(1));
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].path, log_path);
        assert_eq!(
            config.request_for(&config.sources[0]),
            TailRequest::new(200)
        );
        assert_eq!(
            config.request_for(&config.sources[1]),
            TailRequest::fixed(20)
        );
    }

    #[test]
    fn test_project_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global = write(
            &temp,
            "config.yaml",
            r#"
lines: 50
adaptive: false
sources:
  - name: shared
    path: /var/log/global.log
  - name: global-only
    path: /var/log/other.log
"#,
        );
        let project = write(
            &temp,
            "logtail.yaml",
            r#"
lines: 10
sources:
  - name: shared
    path: /var/log/project.log
"#,
        );

        let discovery = DiscoveryResult {
            project_root: Some(temp.path().to_path_buf()),
            project_config: Some(project),
            global_config: Some(global),
        };
        let config = load(&discovery).unwrap();

        assert_eq!(config.lines, 10);
        assert!(!config.adaptive);
        let names: Vec<&str> = config.sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["shared", "global-only"]);
        assert_eq!(config.sources[0].path, PathBuf::from("/var/log/project.log"));
    }

    #[test]
    fn test_unknown_field_error() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "logtail.yaml", "lnes: 10\n");

        let err = load_single_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&path.to_string_lossy().to_string()));
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write(
            &temp,
            "logtail.yaml",
            r#"
sources:
  - name: cacti
    path: /a.log
  - name: cacti
    path: /b.log
"#,
        );

        let err = load_single_file(&path).unwrap_err();
        match err {
            ConfigError::Validation { entry, .. } => assert_eq!(entry.as_deref(), Some("cacti")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_lead_time_limit() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "logtail.yaml", "maint_lead_secs: 99999999999\n");

        let err = load_single_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_single_file(Path::new("/nonexistent/logtail.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_defaults_without_overrides() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "logtail.yaml", "sources: []\n");

        let config = load_single_file(&path).unwrap();
        assert_eq!(config.lines, DEFAULT_LINE_COUNT);
        assert!(config.adaptive);
        assert!(!config.has_sources());
    }
}
