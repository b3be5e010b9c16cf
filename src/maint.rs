//! Maintenance window schedules.
//!
//! A schedule is either a single window or a window that repeats every N
//! days. Recurring windows that are already over are rolled forward in the
//! site's local time so a window that starts at 02:00 keeps starting at 02:00
//! across daylight saving changes.

use chrono::{DateTime, Days, Duration, TimeZone, Utc};
use tracing::trace;

/// How a schedule repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    OneTime,
    Recurring { interval_days: u32 },
}

/// A named maintenance schedule as stored by the host application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub name: String,
    pub kind: ScheduleKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// One concrete occurrence of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// Whether the window is running, or starts within `lead` of `now`.
    ///
    /// A lead reaching past the representable range counts from the dawn of time.
    pub fn is_upcoming(&self, now: DateTime<Utc>, lead: Duration) -> bool {
        let shown_from = self.start.checked_sub_signed(lead);
        shown_from.map_or(true, |from| now > from) && now < self.end
    }
}

impl Schedule {
    /// The occurrence that is current or next as of `now`.
    ///
    /// Returns `None` for a recurring schedule with a zero interval.
    pub fn current_window<Tz: TimeZone>(&self, now: DateTime<Utc>, tz: &Tz) -> Option<Window> {
        let window = Window {
            start: self.start,
            end: self.end,
        };

        let interval_days = match self.kind {
            ScheduleKind::OneTime => return Some(window),
            ScheduleKind::Recurring { interval_days } => interval_days,
        };
        if interval_days == 0 {
            return None;
        }
        if window.end >= now {
            return Some(window);
        }

        let mut start = self.start.with_timezone(tz);
        let mut end = self.end.with_timezone(tz);
        while end < now {
            start = add_local_days(start, interval_days);
            end = add_local_days(end, interval_days);
            trace!(schedule = %self.name, local_start = %start.naive_local(), "advanced recurring window");
        }

        Some(Window {
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
        })
    }
}

/// Add whole days on the local calendar, falling back to 24h steps when the
/// local time does not exist or is ambiguous on the target day.
fn add_local_days<Tz: TimeZone>(at: DateTime<Tz>, days: u32) -> DateTime<Tz> {
    match at.clone().checked_add_days(Days::new(u64::from(days))) {
        Some(next) => next,
        None => at + Duration::days(i64::from(days)),
    }
}

/// Schedules whose current window is running or starts within `lead`.
pub fn upcoming<'a, Tz: TimeZone>(
    schedules: &'a [Schedule],
    now: DateTime<Utc>,
    tz: &Tz,
    lead: Duration,
) -> Vec<(&'a Schedule, Window)> {
    schedules
        .iter()
        .filter_map(|schedule| {
            let window = schedule.current_window(now, tz)?;
            window.is_upcoming(now, lead).then_some((schedule, window))
        })
        .collect()
}
