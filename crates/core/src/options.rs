//! Options shared by the evaluator and the public entry points.

use chrono::{Local, NaiveDateTime, Utc, Weekday};
use serde::Deserialize;

use crate::datemath::FormatPattern;

/// Where the reference instant is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clock {
    /// Wall-clock time in the system's local timezone.
    #[default]
    Local,
    /// Wall-clock time in UTC.
    Utc,
}

impl Clock {
    /// Read the current wall-clock time.
    #[must_use]
    pub fn now(self) -> NaiveDateTime {
        match self {
            Clock::Local => Local::now().naive_local(),
            Clock::Utc => Utc::now().naive_utc(),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Clock::Local => "local",
            Clock::Utc => "utc",
        }
    }
}

/// Settings applied to every marker in one interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationOptions {
    /// Pattern used when a marker has no format argument.
    pub default_format: FormatPattern,
    /// First day of the week for `start of week` / `end of week`.
    pub week_start: Weekday,
    pub clock: Clock,
}

impl Default for InterpolationOptions {
    fn default() -> Self {
        Self { default_format: FormatPattern::default(), week_start: Weekday::Sun, clock: Clock::Local }
    }
}
