//! # Due-date rollover math.
//!
//! [`next_due_date`] computes when the next occurrence of a recurring task
//! is due. It is pure and deterministic for a given `(base, pattern)` pair:
//! - `daily` advances exactly 24 hours, `weekly` exactly 7 × 24 hours;
//! - `monthly` advances to the same day-of-month next month, clamping to
//!   day 28 when the target month is shorter (see below);
//! - `none` yields no next date at all.
//!
//! ## Monthly clamp
//! A day-of-month that does not exist in the target month (e.g. day 31
//! rolled past February) is clamped to **day 28** of the target month
//! rather than overflowing into the month after. Overflowing would silently
//! skip a month for end-of-month tasks; clamping keeps the cadence.
//!
//! ## Example
//! ```rust
//! use taskrelay::events::RecurrencePattern;
//! use taskrelay::recurrence::{format_due_date, next_due_date, parse_due_date};
//!
//! let base = parse_due_date(Some("2025-01-31T00:00:00"));
//! let next = next_due_date(Some(base), RecurrencePattern::Monthly).unwrap();
//! assert_eq!(format_due_date(next), "2025-02-28T00:00:00");
//! ```

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Utc};

use crate::events::RecurrencePattern;

/// Day-of-month every shorter target month is clamped to.
const CLAMP_DAY: u32 = 28;

/// Parses a wire due-date string, falling back to "now".
///
/// Accepts RFC 3339 (`2025-01-31T00:00:00Z`, offsets allowed) and naive
/// ISO-8601 (`2025-01-31T00:00:00`, optional fractional seconds). A missing
/// or unparseable value yields the current time — an explicit rollover
/// fallback, not an error.
pub fn parse_due_date(raw: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = raw else {
        return Utc::now();
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc();
    }
    Utc::now()
}

/// Formats a due date the way the task service expects it (naive ISO-8601).
pub fn format_due_date(due: DateTime<Utc>) -> String {
    due.naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Computes the next due date for a recurrence pattern.
///
/// - `pattern == none` → `None`; the caller must not create a follow-up.
/// - A missing `current` uses "now" as the rollover base.
/// - `daily` / `weekly` are exact offsets; `monthly` clamps (module docs).
pub fn next_due_date(
    current: Option<DateTime<Utc>>,
    pattern: RecurrencePattern,
) -> Option<DateTime<Utc>> {
    let base = current.unwrap_or_else(Utc::now);
    match pattern {
        RecurrencePattern::None => None,
        RecurrencePattern::Daily => Some(base + Duration::days(1)),
        RecurrencePattern::Weekly => Some(base + Duration::weeks(1)),
        RecurrencePattern::Monthly => next_month(base),
    }
}

/// Same day-of-month next month, clamped to day 28 when that day does not
/// exist in the target month.
fn next_month(base: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let (year, month) = if base.month() == 12 {
        (base.year() + 1, 1)
    } else {
        (base.year(), base.month() + 1)
    };

    base.with_year(year)
        .and_then(|d| d.with_month(month))
        .or_else(|| {
            base.with_day(CLAMP_DAY)
                .and_then(|d| d.with_year(year))
                .and_then(|d| d.with_month(month))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(s: &str) -> DateTime<Utc> {
        parse_due_date(Some(s))
    }

    #[test]
    fn test_daily_advances_exactly_24_hours() {
        let base = at("2025-06-15T09:30:00");
        let next = next_due_date(Some(base), RecurrencePattern::Daily).unwrap();
        assert_eq!(next - base, Duration::hours(24));
    }

    #[test]
    fn test_weekly_advances_exactly_seven_days() {
        let base = at("2025-06-15T09:30:00");
        let next = next_due_date(Some(base), RecurrencePattern::Weekly).unwrap();
        assert_eq!(next - base, Duration::hours(7 * 24));
    }

    #[test]
    fn test_monthly_same_day_when_target_month_is_long_enough() {
        let base = at("2025-03-15T12:00:00");
        let next = next_due_date(Some(base), RecurrencePattern::Monthly).unwrap();
        assert_eq!(format_due_date(next), "2025-04-15T12:00:00");
    }

    #[test]
    fn test_monthly_clamps_to_day_28_instead_of_overflowing() {
        // Day 31 rolled past February: the resulting month has fewer days
        // than the target day, so we clamp to day 28 of the resulting month
        // rather than overflowing into the month after. This clamp is a
        // deliberate policy choice to avoid silent date skips.
        let base = at("2025-01-31T00:00:00");
        let next = next_due_date(Some(base), RecurrencePattern::Monthly).unwrap();
        assert_eq!(format_due_date(next), "2025-02-28T00:00:00");
    }

    #[test]
    fn test_monthly_clamp_for_short_31_day_boundaries() {
        let base = at("2025-05-31T08:00:00");
        let next = next_due_date(Some(base), RecurrencePattern::Monthly).unwrap();
        assert_eq!(format_due_date(next), "2025-06-28T08:00:00");
    }

    #[test]
    fn test_monthly_december_rolls_into_next_year() {
        let base = at("2025-12-10T00:00:00");
        let next = next_due_date(Some(base), RecurrencePattern::Monthly).unwrap();
        assert_eq!(format_due_date(next), "2026-01-10T00:00:00");
    }

    #[test]
    fn test_none_pattern_yields_no_next_date() {
        let base = at("2025-06-15T09:30:00");
        assert!(next_due_date(Some(base), RecurrencePattern::None).is_none());
        assert!(next_due_date(None, RecurrencePattern::None).is_none());
    }

    #[test]
    fn test_missing_base_falls_back_to_now() {
        let next = next_due_date(None, RecurrencePattern::Daily).unwrap();
        let expected = Utc::now() + Duration::days(1);
        let drift = (next - expected).num_seconds().abs();
        assert!(drift < 5, "next {next} should be ~now+1d, drift {drift}s");
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let dt = parse_due_date(Some("2025-01-31T00:00:00+02:00"));
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 1, 30, 22, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_garbage_falls_back_to_now() {
        let dt = parse_due_date(Some("next tuesday-ish"));
        let drift = (Utc::now() - dt).num_seconds().abs();
        assert!(drift < 5, "unparseable input should fall back to now");
    }

    #[test]
    fn test_rollover_is_deterministic() {
        let base = at("2025-02-28T23:59:59");
        let a = next_due_date(Some(base), RecurrencePattern::Monthly);
        let b = next_due_date(Some(base), RecurrencePattern::Monthly);
        assert_eq!(a, b);
    }
}
