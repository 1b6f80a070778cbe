//! Segment navigator for the masked text inputs.
//!
//! Maps caret offsets to year/month/day segments, moves between segments (and
//! between the start and end fields in range mode) on arrow keys, steps the
//! focused segment by one unit, and validates typed entries.

#![allow(missing_docs)]

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::errors::{Endpoint, PickerError, Result};
use crate::date::pattern::DisplayPattern;
use crate::date::value::{DateUnit, DateValue};
use crate::picker::store::{Mode, RangeSide};

static COMPACT_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8}$").expect("digit regex is valid"));

const LAST_SEGMENT: usize = 2;

/// Horizontal arrow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizontal {
    Left,
    Right,
}

/// Where the caret should land: a field, a segment, and its selection range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaretTarget {
    pub field: RangeSide,
    pub segment: usize,
    pub selection: (usize, usize),
}

/// Which field and segment currently have focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingEdit {
    pub field: Option<RangeSide>,
    pub segment: usize,
}

/// Outcome of validating a typed field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Still being typed; nothing to do yet.
    Partial,
    /// A full, valid date.
    Complete(DateValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentNavigator {
    mode: Mode,
    pattern: DisplayPattern,
    pending: PendingEdit,
}

impl SegmentNavigator {
    #[must_use]
    pub fn new(mode: Mode, pattern: DisplayPattern) -> Self {
        Self {
            mode,
            pattern,
            pending: PendingEdit {
                field: None,
                segment: 0,
            },
        }
    }

    #[must_use]
    pub const fn pattern(&self) -> &DisplayPattern {
        &self.pattern
    }

    #[must_use]
    pub const fn pending(&self) -> PendingEdit {
        self.pending
    }

    /// Segment whose range contains `offset`; segment 0 when outside all.
    #[must_use]
    pub fn segment_at(&self, offset: usize) -> usize {
        self.pattern
            .segments()
            .iter()
            .position(|s| s.contains(offset))
            .unwrap_or(0)
    }

    /// Unit edited by a segment index.
    #[must_use]
    pub fn unit_of(&self, segment: usize) -> DateUnit {
        self.pattern.segments()[segment.min(LAST_SEGMENT)].unit
    }

    /// Record focus on a field at a caret offset.
    pub fn focus(&mut self, field: RangeSide, caret: usize) {
        self.pending = PendingEdit {
            field: Some(self.field_for(field)),
            segment: self.caret_segment(caret),
        };
    }

    /// Drop focus tracking (blur / popover close).
    pub fn blur(&mut self) {
        self.pending = PendingEdit::default();
    }

    /// Select a segment in a field and make it the active one.
    pub fn caret_to_segment(&mut self, field: RangeSide, segment: usize) -> CaretTarget {
        let field = self.field_for(field);
        let segment = segment.min(LAST_SEGMENT);
        self.pending = PendingEdit {
            field: Some(field),
            segment,
        };
        let span = self.pattern.segments()[segment];
        CaretTarget {
            field,
            segment,
            selection: (span.start, span.end),
        }
    }

    /// Move one segment left or right from `caret` in `field`.
    ///
    /// A caret on a separator boundary belongs to the segment it closes, so
    /// moving right from there skips the separator into the next segment.
    /// In range mode, moving past the edge of one field lands on the
    /// adjacent segment of the other field; otherwise the move clamps.
    pub fn on_arrow(&mut self, field: RangeSide, caret: usize, direction: Horizontal) -> CaretTarget {
        let field = self.field_for(field);
        let current = self.caret_segment(caret);
        let (field, segment) = match (direction, self.mode, field) {
            (Horizontal::Right, Mode::Range, RangeSide::Start) if current == LAST_SEGMENT => {
                (RangeSide::End, 0)
            }
            (Horizontal::Left, Mode::Range, RangeSide::End) if current == 0 => {
                (RangeSide::Start, LAST_SEGMENT)
            }
            (Horizontal::Right, _, _) => (field, (current + 1).min(LAST_SEGMENT)),
            (Horizontal::Left, _, _) => (field, current.saturating_sub(1)),
        };
        self.caret_to_segment(field, segment)
    }

    /// Step `date` by `delta` units of the active segment.
    #[must_use]
    pub fn step(&self, date: DateValue, delta: i64) -> DateValue {
        date.add(delta, self.unit_of(self.pending.segment))
    }

    /// Boundary-aware segment for a caret offset.
    fn caret_segment(&self, caret: usize) -> usize {
        let segments = self.pattern.segments();
        segments
            .iter()
            .position(|s| s.contains(caret))
            .or_else(|| segments.iter().position(|s| s.end == caret))
            .unwrap_or(0)
    }

    fn field_for(&self, field: RangeSide) -> RangeSide {
        match self.mode {
            Mode::Single => RangeSide::Start,
            Mode::Range => field,
        }
    }
}

/// Name a field the way validation messages do.
#[must_use]
pub const fn endpoint_for(mode: Mode, field: RangeSide) -> Endpoint {
    match (mode, field) {
        (Mode::Single, _) => Endpoint::Date,
        (Mode::Range, RangeSide::Start) => Endpoint::First,
        (Mode::Range, RangeSide::End) => Endpoint::Second,
    }
}

/// Validate the text of one field.
///
/// Eight bare digits are read as `YYYYMMDD`. Text as wide as the pattern is
/// parsed with it. Shorter text counts once it is settled (see
/// [`is_settled_short_entry`]); otherwise it is still in progress. Anything
/// else, or a finished entry that does not name a real day, is rejected.
pub fn parse_entry(raw: &str, pattern: &DisplayPattern, endpoint: Endpoint) -> Result<Entry> {
    let text = raw.trim();
    let invalid = || PickerError::InvalidDateInput {
        endpoint,
        input: raw.to_string(),
    };

    if COMPACT_DIGITS_RE.is_match(text) {
        return DateValue::parse_compact(text)
            .map(Entry::Complete)
            .ok_or_else(invalid);
    }

    let width = text.chars().count();
    if width == pattern.width() {
        return pattern
            .parse_date(text)
            .map(Entry::Complete)
            .ok_or_else(invalid);
    }
    if width > pattern.width() || (width > 8 && text.bytes().all(|b| b.is_ascii_digit())) {
        return Err(invalid());
    }
    if is_settled_short_entry(text, pattern) {
        return pattern
            .parse_date(text)
            .map(Entry::Complete)
            .ok_or_else(invalid);
    }
    Ok(Entry::Partial)
}

/// Unpadded entry such as `2025-6-5`: every segment has digits, the year is
/// complete, and the last segment is either full or cannot take another digit.
fn is_settled_short_entry(text: &str, pattern: &DisplayPattern) -> bool {
    let segments = pattern.segments();
    let runs: Vec<&str> = text
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .collect();
    if runs.len() != segments.len() {
        return false;
    }
    let fits = runs.iter().zip(segments).all(|(run, span)| {
        let width = span.end - span.start;
        run.len() <= width && (span.unit != DateUnit::Year || run.len() == width)
    });
    if !fits {
        return false;
    }

    let (Some(last), Some(span)) = (runs.last(), segments.last()) else {
        return false;
    };
    if last.len() == span.end - span.start {
        return true;
    }
    let Ok(value) = last.parse::<u32>() else {
        return false;
    };
    let max = match span.unit {
        DateUnit::Month => 12,
        DateUnit::Day => 31,
        DateUnit::Week | DateUnit::Year => return false,
    };
    value * 10 > max
}
