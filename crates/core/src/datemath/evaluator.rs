//! Applies parsed operations to a reference instant.

use chrono::{
    Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Weekday,
};

use super::operation::{CalendarUnit, DateExpr, DurationUnit, Operation, Sign};
use crate::error::{InterpolateError, Result};
use crate::options::InterpolationOptions;

/// Evaluate an expression against `reference` and render the result.
///
/// Operations are applied left to right; the format pattern (or the
/// configured default) is applied last.
pub fn evaluate(
    expr: &DateExpr,
    reference: NaiveDateTime,
    options: &InterpolationOptions,
) -> Result<String> {
    let anchor = expr
        .operations()
        .iter()
        .try_fold(reference, |anchor, op| apply(anchor, op, options.week_start))?;

    let pattern = expr.format().unwrap_or(&options.default_format);
    Ok(pattern.render(&anchor))
}

/// Apply a single operation. Format operations leave the anchor unchanged.
pub fn apply(anchor: NaiveDateTime, op: &Operation, week_start: Weekday) -> Result<NaiveDateTime> {
    let result = match op {
        Operation::Offset { sign, amount, unit } => shift(anchor, *sign, *amount, *unit),
        Operation::StartOf(unit) => start_of(anchor, *unit, week_start),
        Operation::EndOf(unit) => end_of(anchor, *unit, week_start),
        Operation::Format(_) => Some(anchor),
    };
    result.ok_or_else(|| InterpolateError::OutOfRange(op.to_string()))
}

fn shift(dt: NaiveDateTime, sign: Sign, amount: i64, unit: DurationUnit) -> Option<NaiveDateTime> {
    let delta = match unit {
        DurationUnit::Seconds => TimeDelta::try_seconds(amount)?,
        DurationUnit::Minutes => TimeDelta::try_minutes(amount)?,
        DurationUnit::Hours => TimeDelta::try_hours(amount)?,
        DurationUnit::Days => TimeDelta::try_days(amount)?,
        DurationUnit::Weeks => TimeDelta::try_weeks(amount)?,
        DurationUnit::Months => return shift_months(dt, sign, amount),
        DurationUnit::Years => return shift_months(dt, sign, amount.checked_mul(12)?),
    };

    match sign {
        Sign::Plus => dt.checked_add_signed(delta),
        Sign::Minus => dt.checked_sub_signed(delta),
    }
}

// Calendar months clamp the day (Jan 31 + 1 month = Feb 28/29).
fn shift_months(dt: NaiveDateTime, sign: Sign, months: i64) -> Option<NaiveDateTime> {
    let months = Months::new(u32::try_from(months).ok()?);
    match sign {
        Sign::Plus => dt.checked_add_months(months),
        Sign::Minus => dt.checked_sub_months(months),
    }
}

fn start_of(dt: NaiveDateTime, unit: CalendarUnit, week_start: Weekday) -> Option<NaiveDateTime> {
    let date = dt.date();
    match unit {
        CalendarUnit::Year => Some(NaiveDate::from_ymd_opt(date.year(), 1, 1)?.and_time(NaiveTime::MIN)),
        CalendarUnit::Month => Some(date.with_day(1)?.and_time(NaiveTime::MIN)),
        CalendarUnit::Week => {
            let back = (date.weekday().num_days_from_monday() + 7
                - week_start.num_days_from_monday())
                % 7;
            Some(date.checked_sub_days(Days::new(u64::from(back)))?.and_time(NaiveTime::MIN))
        }
        CalendarUnit::Day => Some(date.and_time(NaiveTime::MIN)),
        CalendarUnit::Hour => date.and_hms_opt(dt.hour(), 0, 0),
        CalendarUnit::Minute => date.and_hms_opt(dt.hour(), dt.minute(), 0),
        CalendarUnit::Second => dt.with_nanosecond(0),
    }
}

// One millisecond before the start of the following period.
fn end_of(dt: NaiveDateTime, unit: CalendarUnit, week_start: Weekday) -> Option<NaiveDateTime> {
    let start = start_of(dt, unit, week_start)?;
    let next = match unit {
        CalendarUnit::Year => start.checked_add_months(Months::new(12))?,
        CalendarUnit::Month => start.checked_add_months(Months::new(1))?,
        CalendarUnit::Week => start.checked_add_days(Days::new(7))?,
        CalendarUnit::Day => start.checked_add_days(Days::new(1))?,
        CalendarUnit::Hour => start.checked_add_signed(TimeDelta::hours(1))?,
        CalendarUnit::Minute => start.checked_add_signed(TimeDelta::minutes(1))?,
        CalendarUnit::Second => start.checked_add_signed(TimeDelta::seconds(1))?,
    };
    next.checked_sub_signed(TimeDelta::milliseconds(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datemath::FormatPattern;

    // Tuesday
    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_milli_opt(14, 7, 9, 123)
            .unwrap()
    }

    fn eval(args: &[&str], at: NaiveDateTime) -> String {
        let expr = DateExpr::parse(args).unwrap();
        evaluate(&expr, at, &InterpolationOptions::default()).unwrap()
    }

    #[test]
    fn test_no_operations_uses_default_format() {
        assert_eq!(eval(&[], reference()), "2024-03-05");
    }

    #[test]
    fn test_configured_default_format() {
        let options = InterpolationOptions {
            default_format: FormatPattern::parse("DD/MM/YYYY").unwrap(),
            ..Default::default()
        };
        let expr = DateExpr::parse(&["-1days"]).unwrap();
        assert_eq!(evaluate(&expr, reference(), &options).unwrap(), "04/03/2024");
    }

    #[test]
    fn test_offsets() {
        let at = reference();
        let fmt = "YYYY-MM-DD HH:mm:ss";
        assert_eq!(eval(&["-1seconds", fmt], at), "2024-03-05 14:07:08");
        assert_eq!(eval(&["+1minutes", fmt], at), "2024-03-05 14:08:09");
        assert_eq!(eval(&["+10hours", fmt], at), "2024-03-06 00:07:09");
        assert_eq!(eval(&["-30days", fmt], at), "2024-02-04 14:07:09");
        assert_eq!(eval(&["+1weeks", fmt], at), "2024-03-12 14:07:09");
        assert_eq!(eval(&["-3months", fmt], at), "2023-12-05 14:07:09");
        assert_eq!(eval(&["+1years", fmt], at), "2025-03-05 14:07:09");
    }

    #[test]
    fn test_month_offset_clamps_day() {
        let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap().and_hms_opt(8, 0, 0).unwrap();
        assert_eq!(eval(&["+1months"], jan31), "2024-02-29");
        assert_eq!(eval(&["+1months"], jan31 - TimeDelta::days(365)), "2023-02-28");

        let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_opt(8, 0, 0).unwrap();
        assert_eq!(eval(&["-1years"], leap), "2023-02-28");
    }

    #[test]
    fn test_start_of_units() {
        let at = reference();
        let fmt = "YYYY-MM-DD HH:mm:ss.SSS";
        assert_eq!(eval(&["start of year", fmt], at), "2024-01-01 00:00:00.000");
        assert_eq!(eval(&["start of month", fmt], at), "2024-03-01 00:00:00.000");
        assert_eq!(eval(&["start of week", fmt], at), "2024-03-03 00:00:00.000");
        assert_eq!(eval(&["start of day", fmt], at), "2024-03-05 00:00:00.000");
        assert_eq!(eval(&["start of hour", fmt], at), "2024-03-05 14:00:00.000");
        assert_eq!(eval(&["start of minute", fmt], at), "2024-03-05 14:07:00.000");
        assert_eq!(eval(&["start of second", fmt], at), "2024-03-05 14:07:09.000");
    }

    #[test]
    fn test_end_of_units() {
        let at = reference();
        let fmt = "YYYY-MM-DD HH:mm:ss.SSS";
        assert_eq!(eval(&["end of year", fmt], at), "2024-12-31 23:59:59.999");
        assert_eq!(eval(&["end of month", fmt], at), "2024-03-31 23:59:59.999");
        assert_eq!(eval(&["end of week", fmt], at), "2024-03-09 23:59:59.999");
        assert_eq!(eval(&["end of day", fmt], at), "2024-03-05 23:59:59.999");
        assert_eq!(eval(&["end of hour", fmt], at), "2024-03-05 14:59:59.999");
        assert_eq!(eval(&["end of minute", fmt], at), "2024-03-05 14:07:59.999");
        assert_eq!(eval(&["end of second", fmt], at), "2024-03-05 14:07:09.999");
    }

    #[test]
    fn test_end_of_february_in_leap_year() {
        let at = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(eval(&["end of month"], at), "2024-02-29");
    }

    #[test]
    fn test_week_start_is_configurable() {
        let options = InterpolationOptions { week_start: Weekday::Mon, ..Default::default() };
        let expr = DateExpr::parse(&["start of week"]).unwrap();
        assert_eq!(evaluate(&expr, reference(), &options).unwrap(), "2024-03-04");

        // a Sunday is its own week start with the default
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap().and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(eval(&["start of week"], sunday), "2024-03-03");
        assert_eq!(evaluate(&expr, sunday, &options).unwrap(), "2024-02-26");
    }

    #[test]
    fn test_operation_order_matters() {
        let at = reference();
        assert_eq!(eval(&["-1months", "start of year"], at), "2024-01-01");
        assert_eq!(eval(&["start of year", "-1months"], at), "2023-12-01");
        assert_eq!(eval(&["-1years", "start of year"], at), "2023-01-01");
        assert_eq!(eval(&["-1years", "-1years", "start of year"], at), "2022-01-01");
        assert_eq!(eval(&["-1years", "end of year", "YYYY-MM-DD HH:mm"], at), "2023-12-31 23:59");
    }

    #[test]
    fn test_out_of_range() {
        let expr = DateExpr::parse(&["+1years"]).unwrap();
        let err = evaluate(&expr, NaiveDateTime::MAX, &InterpolationOptions::default()).unwrap_err();
        assert_eq!(err, InterpolateError::OutOfRange("+1years".into()));

        let expr = DateExpr::parse(&["-9999999999999days"]).unwrap();
        let err = evaluate(&expr, reference(), &InterpolationOptions::default()).unwrap_err();
        assert_eq!(err, InterpolateError::OutOfRange("-9999999999999days".into()));

        let expr = DateExpr::parse(&["end of year"]).unwrap();
        let err = evaluate(&expr, NaiveDateTime::MAX, &InterpolationOptions::default()).unwrap_err();
        assert_eq!(err, InterpolateError::OutOfRange("end of year".into()));
    }
}
