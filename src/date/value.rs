//! Calendar date value: unit arithmetic, period boundaries, formatting.

#![allow(missing_docs)]

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar unit used for arithmetic and period boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateUnit {
    Day,
    Week,
    Month,
    Year,
}

/// A calendar date with no time-of-day component.
///
/// Ordering is chronological, so `a < b` means `a` is the earlier day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateValue(NaiveDate);

impl DateValue {
    /// Build a date from year/month/day, `None` if the day does not exist.
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Current local calendar day.
    #[must_use]
    pub fn today() -> Self {
        Self(chrono::Local::now().date_naive())
    }

    #[must_use]
    pub const fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    #[must_use]
    pub const fn as_naive(self) -> NaiveDate {
        self.0
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// Add `amount` units (negative subtracts), `None` past the calendar bounds.
    ///
    /// Month and year steps clamp the day to the target month's length, so
    /// `2025-01-31 + 1 month` is `2025-02-28`.
    #[must_use]
    pub fn checked_add(self, amount: i64, unit: DateUnit) -> Option<Self> {
        let magnitude = amount.unsigned_abs();
        let forward = amount >= 0;
        let shifted = match unit {
            DateUnit::Day => step_days(self.0, magnitude, forward),
            DateUnit::Week => step_days(self.0, magnitude.checked_mul(7)?, forward),
            DateUnit::Month => step_months(self.0, magnitude, forward),
            DateUnit::Year => step_months(self.0, magnitude.checked_mul(12)?, forward),
        };
        shifted.map(Self)
    }

    /// Saturating form of [`Self::checked_add`].
    #[must_use]
    pub fn add(self, amount: i64, unit: DateUnit) -> Self {
        self.checked_add(amount, unit).unwrap_or(if amount < 0 {
            Self(NaiveDate::MIN)
        } else {
            Self(NaiveDate::MAX)
        })
    }

    #[must_use]
    pub fn add_days(self, amount: i64) -> Self {
        self.add(amount, DateUnit::Day)
    }

    /// First day of the period containing this date. Weeks start on Monday.
    #[must_use]
    pub fn start_of(self, unit: DateUnit) -> Self {
        let date = self.0;
        let start = match unit {
            DateUnit::Day => Some(date),
            DateUnit::Week => {
                date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
            }
            DateUnit::Month => date.with_day(1),
            DateUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
        };
        start.map_or(self, Self)
    }

    /// Last day of the period containing this date. Weeks end on Sunday.
    #[must_use]
    pub fn end_of(self, unit: DateUnit) -> Self {
        match unit {
            DateUnit::Day => self,
            DateUnit::Week => self.start_of(DateUnit::Week).add_days(6),
            DateUnit::Month => self
                .start_of(DateUnit::Month)
                .add(1, DateUnit::Month)
                .add_days(-1),
            DateUnit::Year => NaiveDate::from_ymd_opt(self.year(), 12, 31).map_or(self, Self),
        }
    }

    #[must_use]
    pub fn same_day(self, other: Self) -> bool {
        self == other
    }

    #[must_use]
    pub fn is_before(self, other: Self) -> bool {
        self < other
    }

    #[must_use]
    pub fn is_after(self, other: Self) -> bool {
        self > other
    }

    /// Signed number of days from `self` to `other`.
    #[must_use]
    pub fn days_until(self, other: Self) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Render with a chrono strftime format (see `DisplayPattern::strftime`).
    #[must_use]
    pub fn format_with(self, strftime: &str) -> String {
        self.0.format(strftime).to_string()
    }

    /// Parse a compact `YYYYMMDD` string. Exactly eight ASCII digits required.
    #[must_use]
    pub fn parse_compact(raw: &str) -> Option<Self> {
        if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year = raw[0..4].parse::<i32>().ok()?;
        let month = raw[4..6].parse::<u32>().ok()?;
        let day = raw[6..8].parse::<u32>().ok()?;
        Self::from_ymd(year, month, day)
    }

    /// Parse with a chrono strftime format.
    #[must_use]
    pub fn parse_with(raw: &str, strftime: &str) -> Option<Self> {
        NaiveDate::parse_from_str(raw.trim(), strftime)
            .ok()
            .map(Self)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for DateValue {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

fn step_days(date: NaiveDate, days: u64, forward: bool) -> Option<NaiveDate> {
    if forward {
        date.checked_add_days(Days::new(days))
    } else {
        date.checked_sub_days(Days::new(days))
    }
}

fn step_months(date: NaiveDate, months: u64, forward: bool) -> Option<NaiveDate> {
    let months = Months::new(u32::try_from(months).ok()?);
    if forward {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> DateValue {
        DateValue::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn add_days_crosses_month_boundary() {
        assert_eq!(d(2025, 1, 30).add_days(3), d(2025, 2, 2));
        assert_eq!(d(2025, 3, 1).add_days(-1), d(2025, 2, 28));
    }

    #[test]
    fn add_months_clamps_to_month_length() {
        assert_eq!(d(2025, 1, 31).add(1, DateUnit::Month), d(2025, 2, 28));
        assert_eq!(d(2024, 3, 31).add(-1, DateUnit::Month), d(2024, 2, 29));
    }

    #[test]
    fn add_years_handles_leap_day() {
        assert_eq!(d(2024, 2, 29).add(1, DateUnit::Year), d(2025, 2, 28));
    }

    #[test]
    fn add_weeks_is_seven_days() {
        assert_eq!(d(2025, 6, 11).add(-2, DateUnit::Week), d(2025, 5, 28));
    }

    #[test]
    fn week_boundaries_are_monday_to_sunday() {
        // 2025-06-11 is a Wednesday.
        assert_eq!(d(2025, 6, 11).start_of(DateUnit::Week), d(2025, 6, 9));
        assert_eq!(d(2025, 6, 11).end_of(DateUnit::Week), d(2025, 6, 15));
        // Sunday belongs to the week that started the Monday before.
        assert_eq!(d(2025, 6, 15).start_of(DateUnit::Week), d(2025, 6, 9));
        assert_eq!(d(2025, 6, 9).start_of(DateUnit::Week), d(2025, 6, 9));
    }

    #[test]
    fn month_and_year_boundaries() {
        assert_eq!(d(2024, 2, 10).start_of(DateUnit::Month), d(2024, 2, 1));
        assert_eq!(d(2024, 2, 10).end_of(DateUnit::Month), d(2024, 2, 29));
        assert_eq!(d(2025, 12, 5).end_of(DateUnit::Month), d(2025, 12, 31));
        assert_eq!(d(2025, 7, 4).start_of(DateUnit::Year), d(2025, 1, 1));
        assert_eq!(d(2025, 7, 4).end_of(DateUnit::Year), d(2025, 12, 31));
    }

    #[test]
    fn days_until_is_signed() {
        assert_eq!(d(2025, 1, 1).days_until(d(2025, 1, 10)), 9);
        assert_eq!(d(2025, 1, 10).days_until(d(2025, 1, 1)), -9);
    }

    #[test]
    fn compact_parse_requires_eight_valid_digits() {
        assert_eq!(DateValue::parse_compact("20250615"), Some(d(2025, 6, 15)));
        assert_eq!(DateValue::parse_compact("20251301"), None);
        assert_eq!(DateValue::parse_compact("2025061"), None);
        assert_eq!(DateValue::parse_compact("2025-6-15"), None);
    }

    #[test]
    fn display_is_iso() {
        assert_eq!(d(2025, 6, 5).to_string(), "2025-06-05");
        assert_eq!(d(2025, 6, 5).format_with("%d/%m/%Y"), "05/06/2025");
    }

    #[test]
    fn comparisons_follow_calendar_order() {
        assert!(d(2025, 1, 1).is_before(d(2025, 1, 2)));
        assert!(d(2025, 1, 2).is_after(d(2025, 1, 1)));
        assert!(d(2025, 1, 2).same_day(d(2025, 1, 2)));
    }

    #[test]
    fn add_saturates_at_calendar_bounds() {
        let max = DateValue::from_naive(NaiveDate::MAX);
        assert_eq!(max.add_days(1), max);
        assert!(max.checked_add(1, DateUnit::Day).is_none());
    }
}
