//! Typed operations and the classifier that produces them.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::format::FormatPattern;
use crate::error::{InterpolateError, Result};

static OFFSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-])(\d+)(seconds|minutes|hours|days|weeks|months|years)$")
        .expect("valid regex")
});

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(start|end) of (year|month|week|day|hour|minute|second)$")
        .expect("valid regex")
});

/// Direction of a relative offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

/// Units for relative offsets (`-1days`, `+2months`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

/// Units a date can be snapped to (`start of week`, `end of year`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

/// One parsed argument of a `date(...)` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Shift the anchor by `amount` units.
    Offset { sign: Sign, amount: i64, unit: DurationUnit },
    /// Snap to the first instant of the containing period.
    StartOf(CalendarUnit),
    /// Snap to the last millisecond of the containing period.
    EndOf(CalendarUnit),
    /// Output pattern, applied after every other operation.
    Format(FormatPattern),
}

impl DurationUnit {
    fn from_name(s: &str) -> Option<Self> {
        Some(match s {
            "seconds" => Self::Seconds,
            "minutes" => Self::Minutes,
            "hours" => Self::Hours,
            "days" => Self::Days,
            "weeks" => Self::Weeks,
            "months" => Self::Months,
            "years" => Self::Years,
            _ => return None,
        })
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }
}

impl CalendarUnit {
    fn from_name(s: &str) -> Option<Self> {
        Some(match s.to_lowercase().as_str() {
            "year" => Self::Year,
            "month" => Self::Month,
            "week" => Self::Week,
            "day" => Self::Day,
            "hour" => Self::Hour,
            "minute" => Self::Minute,
            "second" => Self::Second,
            _ => return None,
        })
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset { sign, amount, unit } => {
                let sign = match sign {
                    Sign::Plus => '+',
                    Sign::Minus => '-',
                };
                write!(f, "{sign}{amount}{}", unit.as_str())
            }
            Self::StartOf(unit) => write!(f, "start of {}", unit.as_str()),
            Self::EndOf(unit) => write!(f, "end of {}", unit.as_str()),
            Self::Format(pattern) => write!(f, "{pattern}"),
        }
    }
}

/// Classify a single argument.
///
/// Tried in order: relative offset, `start of <unit>`, `end of <unit>`,
/// format pattern. The anchor forms are case-insensitive.
pub fn classify(arg: &str) -> Result<Operation> {
    let invalid = || InterpolateError::InvalidDateExpression(arg.to_string());

    let op = if let Some(caps) = OFFSET_RE.captures(arg) {
        let sign = if &caps[1] == "+" { Sign::Plus } else { Sign::Minus };
        let amount: i64 = caps[2].parse().map_err(|_| invalid())?;
        let unit = DurationUnit::from_name(&caps[3]).ok_or_else(invalid)?;
        Operation::Offset { sign, amount, unit }
    } else if let Some(caps) = ANCHOR_RE.captures(arg) {
        let unit = CalendarUnit::from_name(&caps[2]).ok_or_else(invalid)?;
        if caps[1].eq_ignore_ascii_case("start") {
            Operation::StartOf(unit)
        } else {
            Operation::EndOf(unit)
        }
    } else {
        Operation::Format(FormatPattern::parse(arg).ok_or_else(invalid)?)
    };

    trace!(argument = arg, operation = ?op, "classified date argument");
    Ok(op)
}

/// An ordered list of operations parsed from one marker.
///
/// At most one [`Operation::Format`] is allowed and it must come last.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateExpr {
    operations: Vec<Operation>,
}

impl DateExpr {
    /// Classify every argument, enforcing the format-last rule.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let mut operations = Vec::with_capacity(args.len());

        for (i, arg) in args.iter().enumerate() {
            let arg = arg.as_ref();
            let op = classify(arg)?;
            if matches!(op, Operation::Format(_)) && i + 1 != args.len() {
                return Err(InterpolateError::InvalidDateExpression(arg.to_string()));
            }
            operations.push(op);
        }

        Ok(Self { operations })
    }

    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// The explicit output pattern, if one was given.
    #[must_use]
    pub fn format(&self) -> Option<&FormatPattern> {
        match self.operations.last() {
            Some(Operation::Format(pattern)) => Some(pattern),
            _ => None,
        }
    }
}
