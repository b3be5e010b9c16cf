//! Config types for logtail.
//!
//! Defines structures for parsing and representing configuration files.

use serde::Deserialize;
use std::path::PathBuf;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::maint::{self, Schedule, Window};
use crate::reader::{TailRequest, DEFAULT_LINE_COUNT};

/// Longest accepted maintenance lead time (one year).
pub const MAX_MAINT_LEAD_SECS: u64 = 365 * 24 * 3600;

/// Raw config file structure (used for parsing).
///
/// Mirrors the YAML file. Unknown fields are rejected with an error.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Default number of trailing lines for every source.
    pub lines: Option<usize>,
    /// Default chunk policy for every source.
    pub adaptive: Option<bool>,
    /// Lead time in seconds before a maintenance window is reported.
    pub maint_lead_secs: Option<u64>,
    /// List of log sources.
    #[serde(default)]
    pub sources: Vec<RawSource>,
}

/// Raw source from config file. The path is not yet tilde-expanded.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSource {
    pub name: String,
    pub path: PathBuf,
    pub lines: Option<usize>,
    pub adaptive: Option<bool>,
}

/// Validated source with an expanded path.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    /// Display name for this source.
    pub name: String,
    /// Expanded path to the log file.
    pub path: PathBuf,
    /// Per-source line count, if set.
    pub lines: Option<usize>,
    /// Per-source chunk policy, if set.
    pub adaptive: Option<bool>,
}

/// Effective configuration after merging global and project files.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub lines: usize,
    pub adaptive: bool,
    /// How long before its start a maintenance window is reported.
    pub maint_lead: Duration,
    /// Project sources first, then global ones.
    pub sources: Vec<Source>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lines: DEFAULT_LINE_COUNT,
            adaptive: true,
            maint_lead: Duration::zero(),
            sources: Vec::new(),
        }
    }
}

impl Config {
    /// Tail request for `source`, falling back to the config defaults.
    pub fn request_for(&self, source: &Source) -> TailRequest {
        TailRequest {
            line_count: source.lines.unwrap_or(self.lines),
            adaptive: source.adaptive.unwrap_or(self.adaptive),
        }
    }

    /// Look up a source by name.
    pub fn source(&self, name: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.name == name)
    }

    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }

    /// Maintenance windows running now or starting within the configured lead.
    pub fn upcoming_maintenance<'a, Tz: TimeZone>(
        &self,
        schedules: &'a [Schedule],
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Vec<(&'a Schedule, Window)> {
        maint::upcoming(schedules, now, tz, self.maint_lead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(lines: Option<usize>, adaptive: Option<bool>) -> Source {
        Source {
            name: "cacti".to_string(),
            path: PathBuf::from("/var/log/cacti.log"),
            lines,
            adaptive,
        }
    }

    #[test]
    fn test_request_uses_defaults() {
        let config = Config::default();
        let request = config.request_for(&source(None, None));
        assert_eq!(request, TailRequest::new(DEFAULT_LINE_COUNT));
    }

    #[test]
    fn test_request_uses_source_overrides() {
        let config = Config::default();
        let request = config.request_for(&source(Some(50), Some(false)));
        assert_eq!(request, TailRequest::fixed(50));
    }

    #[test]
    fn test_upcoming_maintenance_uses_lead() {
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 2, 0, 0).unwrap();
        let schedules = vec![Schedule {
            name: "switch upgrade".to_string(),
            kind: maint::ScheduleKind::OneTime,
            start,
            end: start + Duration::hours(2),
        }];
        let now = start - Duration::hours(6);

        let without_lead = Config::default();
        assert!(without_lead.upcoming_maintenance(&schedules, now, &Utc).is_empty());

        let with_lead = Config {
            maint_lead: Duration::hours(12),
            ..Default::default()
        };
        let found = with_lead.upcoming_maintenance(&schedules, now, &Utc);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0.name, "switch upgrade");
    }

    #[test]
    fn test_source_lookup() {
        let config = Config {
            sources: vec![source(None, None)],
            ..Default::default()
        };
        assert!(config.has_sources());
        assert!(config.source("cacti").is_some());
        assert!(config.source("missing").is_none());
    }
}
