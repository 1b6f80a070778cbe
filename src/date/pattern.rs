//! Display pattern (text mask) for the masked date inputs.
//!
//! A pattern such as `YYYY-MM-DD` carries three tokens and literal separators.
//! From it we derive the chrono format used for rendering/parsing and the
//! fixed caret range of each segment inside the rendered text.

#![allow(missing_docs)]

use std::sync::LazyLock;

use regex::Regex;

use crate::core::errors::{PickerError, Result};
use crate::date::value::{DateUnit, DateValue};

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"YYYY|MM|DD").expect("token regex is valid"));

/// Pattern used when none is configured.
pub const DEFAULT_PATTERN: &str = "YYYY-MM-DD";

/// Half-open caret range `[start, end)` of one segment in the rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSpan {
    pub unit: DateUnit,
    pub start: usize,
    pub end: usize,
}

impl SegmentSpan {
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Parsed display pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPattern {
    source: String,
    strftime: String,
    segments: [SegmentSpan; 3],
    width: usize,
}

impl DisplayPattern {
    /// Parse a pattern. Each of `YYYY`, `MM`, `DD` must occur exactly once and
    /// no other letters may appear outside the tokens.
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |details: &str| PickerError::InvalidPattern {
            pattern: pattern.to_string(),
            details: details.to_string(),
        };

        let mut strftime = String::with_capacity(pattern.len() + 3);
        let mut spans = Vec::with_capacity(3);
        let mut char_offset = 0usize;
        let mut cursor = 0usize;

        for token in TOKEN_RE.find_iter(pattern) {
            let literal = &pattern[cursor..token.start()];
            push_literal(&mut strftime, literal).map_err(|()| invalid("stray letters"))?;
            char_offset += literal.chars().count();

            let (unit, directive) = match token.as_str() {
                "YYYY" => (DateUnit::Year, "%Y"),
                "MM" => (DateUnit::Month, "%m"),
                _ => (DateUnit::Day, "%d"),
            };
            if spans.iter().any(|s: &SegmentSpan| s.unit == unit) {
                return Err(invalid("duplicate token"));
            }
            let len = token.as_str().len();
            spans.push(SegmentSpan {
                unit,
                start: char_offset,
                end: char_offset + len,
            });
            strftime.push_str(directive);
            char_offset += len;
            cursor = token.end();
        }

        let tail = &pattern[cursor..];
        push_literal(&mut strftime, tail).map_err(|()| invalid("stray letters"))?;
        char_offset += tail.chars().count();

        let segments: [SegmentSpan; 3] = spans
            .try_into()
            .map_err(|_| invalid("expected YYYY, MM and DD exactly once"))?;

        Ok(Self {
            source: pattern.to_string(),
            strftime,
            segments,
            width: char_offset,
        })
    }

    /// The `YYYY-MM-DD` mask.
    #[must_use]
    pub fn iso() -> Self {
        Self {
            source: DEFAULT_PATTERN.to_string(),
            strftime: "%Y-%m-%d".to_string(),
            segments: [
                SegmentSpan {
                    unit: DateUnit::Year,
                    start: 0,
                    end: 4,
                },
                SegmentSpan {
                    unit: DateUnit::Month,
                    start: 5,
                    end: 7,
                },
                SegmentSpan {
                    unit: DateUnit::Day,
                    start: 8,
                    end: 10,
                },
            ],
            width: 10,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    /// Segments in positional order.
    #[must_use]
    pub const fn segments(&self) -> &[SegmentSpan; 3] {
        &self.segments
    }

    /// Rendered width in characters.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn format(&self, date: DateValue) -> String {
        date.format_with(&self.strftime)
    }

    #[must_use]
    pub fn parse_date(&self, raw: &str) -> Option<DateValue> {
        DateValue::parse_with(raw, &self.strftime)
    }
}

impl Default for DisplayPattern {
    fn default() -> Self {
        Self::iso()
    }
}

fn push_literal(out: &mut String, literal: &str) -> std::result::Result<(), ()> {
    for ch in literal.chars() {
        if ch.is_alphabetic() {
            return Err(());
        }
        if ch == '%' {
            out.push_str("%%");
        } else {
            out.push(ch);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_constructor_matches_parsed_form() {
        assert_eq!(DisplayPattern::parse("YYYY-MM-DD").unwrap(), DisplayPattern::iso());
    }

    #[test]
    fn iso_segment_offsets() {
        let p = DisplayPattern::iso();
        let spans: Vec<(usize, usize)> = p.segments().iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(spans, vec![(0, 4), (5, 7), (8, 10)]);
        assert_eq!(p.width(), 10);
    }

    #[test]
    fn day_first_pattern_orders_segments_by_position() {
        let p = DisplayPattern::parse("DD.MM.YYYY").unwrap();
        let units: Vec<DateUnit> = p.segments().iter().map(|s| s.unit).collect();
        assert_eq!(units, vec![DateUnit::Day, DateUnit::Month, DateUnit::Year]);
        assert_eq!(p.segments()[2].start, 6);
        assert_eq!(p.strftime(), "%d.%m.%Y");
    }

    #[test]
    fn format_and_parse_follow_pattern() {
        let p = DisplayPattern::parse("YYYY/MM/DD").unwrap();
        let date = DateValue::from_ymd(2025, 6, 5).unwrap();
        assert_eq!(p.format(date), "2025/06/05");
        assert_eq!(p.parse_date("2025/06/05"), Some(date));
        assert_eq!(p.parse_date("2025-06-05"), None);
    }

    #[test]
    fn percent_literal_is_escaped() {
        let p = DisplayPattern::parse("YYYY%MM%DD").unwrap();
        let date = DateValue::from_ymd(2025, 1, 2).unwrap();
        assert_eq!(p.format(date), "2025%01%02");
    }

    #[test]
    fn missing_or_duplicate_tokens_rejected() {
        assert!(DisplayPattern::parse("YYYY-MM").is_err());
        assert!(DisplayPattern::parse("YYYY-MM-DD-DD").is_err());
        assert!(DisplayPattern::parse("YYYY-MM-DD HH").is_err());
    }

    #[test]
    fn invalid_pattern_error_code() {
        let err = DisplayPattern::parse("MM-DD").unwrap_err();
        assert_eq!(err.code(), "DRP-1101");
    }
}
