//! Generation policy: which column is the audit column and the time window
//! its values are drawn from.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use rand::{Rng, RngCore};

/// Half-open interval `[start, end)` of local wall-clock instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// The current local day, midnight to next midnight.
    pub fn today() -> Self {
        let start = Local::now().date_naive().and_time(NaiveTime::MIN);
        Self::new(start, start + TimeDelta::days(1))
    }

    /// Uniform instant in `[start, end)`, or `start` when the window is empty
    /// or inverted.
    pub fn random_instant(&self, rng: &mut dyn RngCore) -> NaiveDateTime {
        if self.is_empty() {
            return self.start;
        }

        let span = self.end - self.start;
        match span.num_nanoseconds() {
            Some(nanos) => self.start + TimeDelta::nanoseconds(rng.random_range(0..nanos)),
            // Wider than i64 nanoseconds (~292 years): fall back to whole seconds
            None => self.start + TimeDelta::seconds(rng.random_range(0..span.num_seconds())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::today()
    }
}

impl std::str::FromStr for TimeWindow {
    type Err = String;

    /// Parse `START,END`. Each bound is `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`;
    /// a date-only END includes that whole day.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err(format!(
                "Invalid time range: '{}'. Expected START,END (e.g. 2024-01-01,2024-01-31)",
                s
            ));
        }

        let start = parse_bound(parts[0].trim(), false)?;
        let end = parse_bound(parts[1].trim(), true)?;
        Ok(Self::new(start, end))
    }
}

fn parse_bound(s: &str, is_end: bool) -> Result<NaiveDateTime, String> {
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {} (expected YYYY-MM-DD)", s, e))?;
    let day = if is_end {
        date.succ_opt()
            .ok_or_else(|| format!("Date out of range: {}", s))?
    } else {
        date
    };
    Ok(day.and_time(NaiveTime::MIN))
}

/// Read-only settings shared by every synthesis call for a table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationPolicy {
    pub audit_column: Option<String>,
    pub window: TimeWindow,
}

impl GenerationPolicy {
    pub fn new(audit_column: Option<String>, window: TimeWindow) -> Self {
        Self {
            audit_column,
            window,
        }
    }

    /// Exact, case-sensitive match against the configured audit column
    pub fn is_audit_column(&self, name: &str) -> bool {
        self.audit_column.as_deref() == Some(name)
    }
}
