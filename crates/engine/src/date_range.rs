//! Date-range filter.
//!
//! Pure resolution of a named range token (plus optional explicit bounds)
//! into a concrete inclusive `[start, end]` window. The end bound is
//! always normalized to the last instant of its day. `now` is an explicit
//! argument so callers and tests control the reference instant.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeToken {
    Last30Days,
    CurrentWeek,
    CurrentMonth,
    LastMonth,
    LastSixMonths,
    CurrentYear,
    LastYear,
    Custom,
}

impl RangeToken {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Last30Days => "last30Days",
            Self::CurrentWeek => "currentWeek",
            Self::CurrentMonth => "currentMonth",
            Self::LastMonth => "lastMonth",
            Self::LastSixMonths => "lastSixMonths",
            Self::CurrentYear => "currentYear",
            Self::LastYear => "lastYear",
            Self::Custom => "custom",
        }
    }
}

impl TryFrom<&str> for RangeToken {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "last30Days" => Ok(Self::Last30Days),
            "currentWeek" => Ok(Self::CurrentWeek),
            "currentMonth" => Ok(Self::CurrentMonth),
            "lastMonth" => Ok(Self::LastMonth),
            "lastSixMonths" => Ok(Self::LastSixMonths),
            "currentYear" => Ok(Self::CurrentYear),
            "lastYear" => Ok(Self::LastYear),
            "custom" => Ok(Self::Custom),
            other => Err(EngineError::InvalidDateRange(format!(
                "unknown range token: {other}"
            ))),
        }
    }
}

/// Inclusive date window; `end` sits at 23:59:59.999 of its day.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Whether a record dated `date` (taken at midnight, matching how the
    /// records store day-precision dates) falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let instant = date.and_time(NaiveTime::MIN);
        instant >= self.start && instant <= self.end
    }

    /// Period-overlap test: two windows share at least one instant.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start.and_time(NaiveTime::MIN) <= self.end && end_of_day(end) >= self.start
    }
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn parse_bound(raw: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidDateRange(format!("unparseable date: {raw}")))
}

/// Resolves a range token to concrete bounds relative to `now`.
///
/// Explicit bounds are consulted only for [`RangeToken::Custom`]; a
/// malformed bound fails with `InvalidDateRange` rather than silently
/// substituting the fallback (the fallback covers only an absent bound:
/// one year before `now` for the start, `now` for the end).
pub fn resolve_range(
    token: RangeToken,
    explicit_start: Option<&str>,
    explicit_end: Option<&str>,
    now: NaiveDateTime,
) -> ResultEngine<DateRange> {
    let today = now.date();

    let (start, end) = match token {
        RangeToken::Last30Days => (now - chrono::Duration::days(30), now),
        RangeToken::CurrentWeek => {
            let days_since_monday = today.weekday().num_days_from_monday() as u64;
            let monday = today - Days::new(days_since_monday);
            (start_of_day(monday), now)
        }
        RangeToken::CurrentMonth => {
            let first = today.with_day(1).unwrap_or(today);
            (start_of_day(first), now)
        }
        RangeToken::LastMonth => {
            let first_of_current = today.with_day(1).unwrap_or(today);
            let first_of_previous = first_of_current - Months::new(1);
            let last_of_previous = first_of_current - Days::new(1);
            (start_of_day(first_of_previous), start_of_day(last_of_previous))
        }
        RangeToken::LastSixMonths => {
            // Same day-of-month six months back, clamped to month length.
            (start_of_day(today - Months::new(6)), now)
        }
        RangeToken::CurrentYear => {
            let jan_first = NaiveDate::from_ymd_opt(today.year(), 1, 1)
                .unwrap_or(today);
            (start_of_day(jan_first), now)
        }
        RangeToken::LastYear => {
            let jan_first = NaiveDate::from_ymd_opt(today.year() - 1, 1, 1)
                .unwrap_or(today);
            let dec_last = NaiveDate::from_ymd_opt(today.year() - 1, 12, 31)
                .unwrap_or(today);
            (start_of_day(jan_first), start_of_day(dec_last))
        }
        RangeToken::Custom => {
            let start = match explicit_start {
                Some(raw) => start_of_day(parse_bound(raw)?),
                None => start_of_day(today - Months::new(12)),
            };
            let end = match explicit_end {
                Some(raw) => start_of_day(parse_bound(raw)?),
                None => now,
            };
            if start > end {
                return Err(EngineError::InvalidDateRange(
                    "start is after end".to_string(),
                ));
            }
            (start, end)
        }
    };

    Ok(DateRange {
        start,
        end: end_of_day(end.date()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn last_30_days_is_anchored_to_now() {
        let now = at(2024, 6, 15, 10, 30);
        let range = resolve_range(RangeToken::Last30Days, None, None, now).unwrap();
        assert_eq!(range.start, now - chrono::Duration::days(30));
        assert_eq!(range.end, end_of_day(now.date()));
    }

    #[test]
    fn current_week_starts_on_monday() {
        // 2024-06-15 is a Saturday; the most recent Monday is 06-10.
        let now = at(2024, 6, 15, 10, 30);
        let range = resolve_range(RangeToken::CurrentWeek, None, None, now).unwrap();
        assert_eq!(range.start, at(2024, 6, 10, 0, 0));
        assert_eq!(range.end, end_of_day(now.date()));
    }

    #[test]
    fn current_week_on_a_monday_starts_today() {
        let now = at(2024, 6, 10, 8, 0);
        let range = resolve_range(RangeToken::CurrentWeek, None, None, now).unwrap();
        assert_eq!(range.start, at(2024, 6, 10, 0, 0));
    }

    #[test]
    fn last_month_covers_previous_calendar_month() {
        let now = at(2024, 3, 15, 12, 0);
        let range = resolve_range(RangeToken::LastMonth, None, None, now).unwrap();
        assert_eq!(range.start, at(2024, 2, 1, 0, 0));
        assert_eq!(range.end, end_of_day(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
    }

    #[test]
    fn last_six_months_clamps_day_of_month() {
        // Aug 31 minus six months: February has no day 31.
        let now = at(2024, 8, 31, 12, 0);
        let range = resolve_range(RangeToken::LastSixMonths, None, None, now).unwrap();
        assert_eq!(range.start, at(2024, 2, 29, 0, 0));
    }

    #[test]
    fn last_year_is_the_previous_calendar_year() {
        let now = at(2024, 6, 15, 9, 0);
        let range = resolve_range(RangeToken::LastYear, None, None, now).unwrap();
        assert_eq!(range.start, at(2023, 1, 1, 0, 0));
        assert_eq!(range.end, end_of_day(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
    }

    #[test]
    fn custom_uses_explicit_bounds() {
        let now = at(2024, 6, 15, 9, 0);
        let range =
            resolve_range(RangeToken::Custom, Some("2024-01-10"), Some("2024-02-20"), now).unwrap();
        assert_eq!(range.start, at(2024, 1, 10, 0, 0));
        assert_eq!(range.end, end_of_day(NaiveDate::from_ymd_opt(2024, 2, 20).unwrap()));
    }

    #[test]
    fn custom_falls_back_when_bounds_absent() {
        let now = at(2024, 6, 15, 9, 0);
        let range = resolve_range(RangeToken::Custom, None, None, now).unwrap();
        assert_eq!(range.start, at(2023, 6, 15, 0, 0));
        assert_eq!(range.end, end_of_day(now.date()));
    }

    #[test]
    fn custom_rejects_malformed_bounds() {
        let now = at(2024, 6, 15, 9, 0);
        let err = resolve_range(RangeToken::Custom, Some("not-a-date"), None, now).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDateRange(_)));
        let err = resolve_range(RangeToken::Custom, None, Some("2024-13-99"), now).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDateRange(_)));
    }

    #[test]
    fn custom_rejects_inverted_bounds() {
        let now = at(2024, 6, 15, 9, 0);
        let err = resolve_range(RangeToken::Custom, Some("2024-03-01"), Some("2024-02-01"), now)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDateRange(_)));
    }

    #[test]
    fn contains_is_inclusive_on_both_ends() {
        let now = at(2024, 6, 15, 9, 0);
        let range = resolve_range(RangeToken::CurrentMonth, None, None, now).unwrap();
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()));
    }

    #[test]
    fn token_round_trips_through_strings() {
        for token in [
            RangeToken::Last30Days,
            RangeToken::CurrentWeek,
            RangeToken::CurrentMonth,
            RangeToken::LastMonth,
            RangeToken::LastSixMonths,
            RangeToken::CurrentYear,
            RangeToken::LastYear,
            RangeToken::Custom,
        ] {
            assert_eq!(RangeToken::try_from(token.as_str()).unwrap(), token);
        }
    }
}
