//! Value store: draft (in-progress) vs. committed (externally visible) state.
//!
//! Every handler describes its draft change as a [`DraftMutation`]. The only
//! path that writes committed state is [`ValueStore::commit`] (plus the
//! explicit seeding/clearing entry points used by the controlled `value` prop
//! and the Delete key).

#![allow(missing_docs)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::date::value::DateValue;

/// Fixed for the lifetime of one control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One date.
    #[serde(rename = "date")]
    Single,
    /// Start and end date.
    #[default]
    Range,
}

impl Mode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "date",
            Self::Range => "range",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" | "single" => Ok(Self::Single),
            "range" => Ok(Self::Range),
            other => Err(format!("unknown mode {other:?}")),
        }
    }
}

/// One endpoint of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeSide {
    Start,
    End,
}

impl RangeSide {
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// A possibly-incomplete pair of dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftRange {
    pub start: Option<DateValue>,
    pub end: Option<DateValue>,
}

impl DraftRange {
    pub const EMPTY: Self = Self {
        start: None,
        end: None,
    };

    #[must_use]
    pub const fn new(start: Option<DateValue>, end: Option<DateValue>) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn between(start: DateValue, end: DateValue) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    #[must_use]
    pub const fn get(&self, side: RangeSide) -> Option<DateValue> {
        match side {
            RangeSide::Start => self.start,
            RangeSide::End => self.end,
        }
    }

    pub fn set(&mut self, side: RangeSide, value: Option<DateValue>) {
        match side {
            RangeSide::Start => self.start = value,
            RangeSide::End => self.end = value,
        }
    }

    #[must_use]
    pub fn with(mut self, side: RangeSide, value: Option<DateValue>) -> Self {
        self.set(side, value);
        self
    }

    /// Swap endpoints so the earlier date is `start`.
    #[must_use]
    pub fn normalized(self) -> Self {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end < start => Self::between(end, start),
            _ => self,
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Both endpoints present and on the same day.
    #[must_use]
    pub fn is_single_day(&self) -> bool {
        matches!((self.start, self.end), (Some(a), Some(b)) if a.same_day(b))
    }

    /// Inclusive day count, order-independent. `None` unless complete.
    #[must_use]
    pub fn span_days(&self) -> Option<i64> {
        let (start, end) = (self.start?, self.end?);
        Some(start.days_until(end).abs() + 1)
    }
}

/// The value the host sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum CommittedValue {
    #[serde(rename = "date")]
    Single(Option<DateValue>),
    Range(DraftRange),
}

impl CommittedValue {
    #[must_use]
    pub const fn empty(mode: Mode) -> Self {
        match mode {
            Mode::Single => Self::Single(None),
            Mode::Range => Self::Range(DraftRange::EMPTY),
        }
    }

    /// Committed value viewed as a draft (single dates live in `start`).
    #[must_use]
    pub const fn as_draft(&self) -> DraftRange {
        match *self {
            Self::Single(date) => DraftRange::new(date, None),
            Self::Range(range) => range,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self {
            Self::Single(_) => Mode::Single,
            Self::Range(_) => Mode::Range,
        }
    }
}

/// A draft change requested by an input handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMutation {
    Replace(DraftRange),
    SetEndpoint {
        side: RangeSide,
        value: Option<DateValue>,
    },
    Clear,
}

/// Owner of draft and committed state for one control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueStore {
    mode: Mode,
    draft: DraftRange,
    committed: CommittedValue,
}

impl ValueStore {
    #[must_use]
    pub const fn new(mode: Mode) -> Self {
        Self {
            mode,
            draft: DraftRange::EMPTY,
            committed: CommittedValue::empty(mode),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub const fn draft(&self) -> DraftRange {
        self.draft
    }

    #[must_use]
    pub const fn committed(&self) -> CommittedValue {
        self.committed
    }

    /// Apply a draft mutation. Returns whether the draft changed.
    pub fn apply(&mut self, mutation: DraftMutation) -> bool {
        let next = match mutation {
            DraftMutation::Replace(range) => range,
            DraftMutation::SetEndpoint { side, value } => self.draft.with(side, value),
            DraftMutation::Clear => DraftRange::EMPTY,
        };
        let next = self.restrict(next);
        if next == self.draft {
            return false;
        }
        self.draft = next;
        true
    }

    /// Normalize ordering, promote `draft` to committed, and return it.
    pub fn commit(&mut self, draft: DraftRange) -> CommittedValue {
        let draft = self.restrict(draft.normalized());
        self.draft = draft;
        self.committed = match self.mode {
            Mode::Single => CommittedValue::Single(draft.start),
            Mode::Range => CommittedValue::Range(draft),
        };
        self.committed
    }

    /// Restore the draft from the last committed value.
    pub fn reset(&mut self) {
        self.draft = self.committed.as_draft();
    }

    /// Replace committed and draft state from an external source.
    pub fn seed(&mut self, value: DraftRange) {
        let value = self.restrict(value.normalized());
        self.committed = match self.mode {
            Mode::Single => CommittedValue::Single(value.start),
            Mode::Range => CommittedValue::Range(value),
        };
        self.draft = value;
    }

    /// Clear one endpoint in the draft and, in range mode, in committed state.
    pub fn clear_endpoint(&mut self, side: RangeSide) -> CommittedValue {
        self.draft.set(side, None);
        if let CommittedValue::Range(mut range) = self.committed {
            range.set(side, None);
            self.committed = CommittedValue::Range(range);
        }
        self.committed
    }

    fn restrict(&self, range: DraftRange) -> DraftRange {
        match self.mode {
            Mode::Single => DraftRange::new(range.start, None),
            Mode::Range => range,
        }
    }
}
