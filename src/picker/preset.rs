//! Preset engine: calendar-unit shortcuts and period paging.

#![allow(missing_docs)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::date::pattern::DisplayPattern;
use crate::date::value::{DateUnit, DateValue};
use crate::picker::store::DraftRange;

/// Named shortcut range, or `Custom` for freely picked endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetTag {
    Today,
    Week,
    Month,
    Year,
    #[default]
    Custom,
}

impl PresetTag {
    pub const ALL: [Self; 5] = [
        Self::Today,
        Self::Week,
        Self::Month,
        Self::Year,
        Self::Custom,
    ];

    /// Calendar unit the preset spans; `None` for `Custom`.
    #[must_use]
    pub const fn unit(self) -> Option<DateUnit> {
        match self {
            Self::Today => Some(DateUnit::Day),
            Self::Week => Some(DateUnit::Week),
            Self::Month => Some(DateUnit::Month),
            Self::Year => Some(DateUnit::Year),
            Self::Custom => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::Custom => "custom",
        }
    }

    /// Human label for the preset selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Week => "This week",
            Self::Month => "This month",
            Self::Year => "This year",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for PresetTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown preset {s:?}"))
    }
}

/// Paging direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageDirection {
    Prev,
    Next,
}

impl PageDirection {
    #[must_use]
    pub const fn sign(self) -> i64 {
        match self {
            Self::Prev => -1,
            Self::Next => 1,
        }
    }
}

impl FromStr for PageDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prev" | "previous" => Ok(Self::Prev),
            "next" => Ok(Self::Next),
            other => Err(format!("unknown direction {other:?}")),
        }
    }
}

/// Range a preset covers around `anchor`. `None` for `Custom`, whose
/// endpoints are whatever the user picked.
#[must_use]
pub fn preset_range_for(tag: PresetTag, anchor: DateValue) -> Option<DraftRange> {
    let unit = tag.unit()?;
    Some(DraftRange::between(anchor.start_of(unit), anchor.end_of(unit)))
}

/// Move a range one period in `direction`.
///
/// Unit presets step the start by one unit and re-derive the period bounds,
/// so month-length differences never accumulate. `Custom` slides the whole
/// window by its own inclusive span. Ranges with no endpoint are returned
/// unchanged, as are incomplete custom ranges.
#[must_use]
pub fn shift_period(tag: PresetTag, current: DraftRange, direction: PageDirection) -> DraftRange {
    let current = current.normalized();
    match tag.unit() {
        Some(unit) => {
            let Some(anchor) = current.start.or(current.end) else {
                return current;
            };
            let anchor = anchor.add(direction.sign(), unit);
            preset_range_for(tag, anchor).unwrap_or(current)
        }
        None => {
            let (Some(start), Some(end)) = (current.start, current.end) else {
                return current;
            };
            let step = (start.days_until(end) + 1) * direction.sign();
            DraftRange::between(start.add_days(step), end.add_days(step))
        }
    }
}

/// Single-date paging: one day either way.
#[must_use]
pub fn shift_date(date: DateValue, direction: PageDirection) -> DateValue {
    date.add_days(direction.sign())
}

/// Text shown on the preset trigger for a committed range.
#[must_use]
pub fn preset_label(tag: PresetTag, range: &DraftRange, pattern: &DisplayPattern) -> String {
    let fmt = |date: Option<DateValue>| date.map(|d| pattern.format(d)).unwrap_or_default();
    match (tag, range.start, range.end) {
        (_, None, None) => tag.label().to_string(),
        (PresetTag::Today, start, _) => fmt(start),
        _ => format!("{} ~ {}", fmt(range.start), fmt(range.end)),
    }
}
