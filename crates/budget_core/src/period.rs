//! Accounting period (`YYYY-MM`) and current-period resolution.
//!
//! # Responsibility
//! - Parse, format and step calendar-month period keys.
//! - Resolve the current period from a `Clock` at a fixed UTC+9 offset.
//!
//! # Invariants
//! - `month` is always within `1..=12`.
//! - Display form is zero-padded, so string order equals chronological
//!   order for four-digit years.

use crate::clock::Clock;
use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Offset applied to UTC before taking year and month.
pub const PERIOD_UTC_OFFSET_HOURS: i64 = 9;

static PERIOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("valid period regex"));

/// One calendar month used as the aggregation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

/// Rejected period text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodParseError(String);

impl Display for PeriodParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid period `{}`; expected YYYY-MM", self.0)
    }
}

impl Error for PeriodParseError {}

impl Period {
    /// Builds a period, returning `None` for months outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (0..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Period an item belongs to: the `YYYY-MM` prefix of its purchase date.
    pub fn of_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The calendar month immediately before this one.
    ///
    /// January steps back to December of the previous year.
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let caps = PERIOD_RE
            .captures(trimmed)
            .ok_or_else(|| PeriodParseError(trimmed.to_string()))?;
        let year = caps[1]
            .parse::<i32>()
            .map_err(|_| PeriodParseError(trimmed.to_string()))?;
        let month = caps[2]
            .parse::<u32>()
            .map_err(|_| PeriodParseError(trimmed.to_string()))?;
        Self::new(year, month).ok_or_else(|| PeriodParseError(trimmed.to_string()))
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Resolves the current accounting period from the given clock.
///
/// The instant is shifted to the fixed UTC+9 offset before the calendar
/// month is read, so 15:00 UTC on the last day of a month already belongs
/// to the next period.
pub fn current_period(clock: &impl Clock) -> Period {
    Period::of_date(current_date(clock))
}

/// Calendar date at the fixed UTC+9 offset; the default purchase date.
pub fn current_date(clock: &impl Clock) -> NaiveDate {
    (clock.now().naive_utc() + Duration::hours(PERIOD_UTC_OFFSET_HOURS)).date()
}

#[cfg(test)]
mod tests {
    use super::{current_date, current_period, Period};
    use crate::clock::FixedClock;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn period(text: &str) -> Period {
        text.parse().expect("valid period")
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(Period::new(2024, 5).unwrap().to_string(), "2024-05");
        assert_eq!(Period::new(987, 11).unwrap().to_string(), "0987-11");
    }

    #[test]
    fn parse_rejects_malformed_text() {
        for bad in ["2024-13", "2024-00", "2024-5", "24-05", "2024/05", ""] {
            assert!(bad.parse::<Period>().is_err(), "`{bad}` should be rejected");
        }
        assert_eq!(period(" 2024-05 "), Period::new(2024, 5).unwrap());
    }

    #[test]
    fn previous_rolls_back_over_year_boundary() {
        assert_eq!(period("2024-01").previous(), period("2023-12"));
        assert_eq!(period("2024-05").previous(), period("2024-04"));
        assert_eq!(period("2024-10").previous(), period("2024-09"));
    }

    #[test]
    fn ordering_matches_string_ordering() {
        let mut periods = vec![period("2024-02"), period("2023-12"), period("2024-01")];
        periods.sort();
        let texts: Vec<String> = periods.iter().map(ToString::to_string).collect();
        assert_eq!(texts, ["2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn of_date_takes_year_and_month() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(Period::of_date(date), period("2024-03"));
    }

    #[test]
    fn current_period_uses_utc_plus_nine() {
        let before_midnight = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 31, 14, 59, 59).unwrap());
        assert_eq!(current_period(&before_midnight), period("2024-01"));

        let after_midnight = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 31, 15, 0, 0).unwrap());
        assert_eq!(current_period(&after_midnight), period("2024-02"));

        let new_year = FixedClock::new(Utc.with_ymd_and_hms(2023, 12, 31, 20, 0, 0).unwrap());
        assert_eq!(current_period(&new_year), period("2024-01"));
        assert_eq!(
            current_date(&new_year),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&period("2024-07")).unwrap();
        assert_eq!(json, "\"2024-07\"");
        let back: Period = serde_json::from_str(&json).unwrap();
        assert_eq!(back, period("2024-07"));
    }
}
