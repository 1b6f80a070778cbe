//! Anchor resolver: turn the calendar's full two-endpoint report into a
//! single-endpoint edit.
//!
//! The calendar widget reports the whole selection on every click together
//! with a side hint that stops being reliable once both endpoints hold values.
//! We compare the previous draft with the reported pair to work out which one
//! date the user actually changed and keep the other endpoint anchored.
//!
//! The rule order below is observable (it decides edge cases where both
//! "differs" flags are set or clear) and must not be rearranged.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::date::value::DateValue;
use crate::picker::store::{DraftRange, RangeSide};

/// Which rule produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorRule {
    /// Previous draft was incomplete; the widget's pair is taken as-is.
    Adopted,
    /// Previous draft was a single day; the click opens a new range from it.
    SingleDayExpand,
    /// Neither reported date matches an old endpoint; side hint decided.
    AmbiguousAnchor,
    /// Old start vanished from the report; start moved.
    StartMoved,
    /// Old end vanished from the report; end moved.
    EndMoved,
    /// Report repeats the old pair with an end hint; no net change.
    Confirmed,
}

/// A resolved calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorResolution {
    /// New draft, chronologically ordered.
    pub draft: DraftRange,
    /// The date the user changed.
    pub changed: DateValue,
    pub rule: AnchorRule,
}

/// Resolve a calendar report against the previous draft.
///
/// `None` means no resolvable change: the caller must leave the draft alone.
#[must_use]
pub fn resolve(
    previous: &DraftRange,
    reported: &DraftRange,
    hint: Option<RangeSide>,
) -> Option<AnchorResolution> {
    let (Some(p0), Some(p1)) = (previous.start, previous.end) else {
        return adopt(reported);
    };
    let (r0, r1) = (reported.start, reported.end);

    if p0.same_day(p1) {
        let new_day = [r0, r1].into_iter().flatten().find(|r| !r.same_day(p1))?;
        return Some(AnchorResolution {
            draft: first_min_day(new_day, p1),
            changed: new_day,
            rule: AnchorRule::SingleDayExpand,
        });
    }

    let differs_from = |p: DateValue| !is_day(r0, p) && !is_day(r1, p);
    let differs_from_p0 = differs_from(p0);
    let differs_from_p1 = differs_from(p1);

    match (differs_from_p0, differs_from_p1) {
        (true, true) => {
            let (side, changed) = match hint? {
                RangeSide::End => (RangeSide::End, r1?),
                RangeSide::Start => (RangeSide::Start, r0?),
            };
            Some(replace(previous, side, changed, AnchorRule::AmbiguousAnchor))
        }
        (true, false) => {
            let changed = other_than(r0, r1, p1)?;
            Some(replace(previous, RangeSide::Start, changed, AnchorRule::StartMoved))
        }
        (false, true) => {
            let changed = other_than(r0, r1, p0)?;
            Some(replace(previous, RangeSide::End, changed, AnchorRule::EndMoved))
        }
        (false, false) => match hint {
            Some(RangeSide::End) => Some(AnchorResolution {
                draft: previous.normalized(),
                changed: p1,
                rule: AnchorRule::Confirmed,
            }),
            _ => None,
        },
    }
}

/// Order two days so the earlier one is the start.
#[must_use]
pub fn first_min_day(a: DateValue, b: DateValue) -> DraftRange {
    if b < a {
        DraftRange::between(b, a)
    } else {
        DraftRange::between(a, b)
    }
}

fn adopt(reported: &DraftRange) -> Option<AnchorResolution> {
    let changed = reported.end.or(reported.start)?;
    Some(AnchorResolution {
        draft: reported.normalized(),
        changed,
        rule: AnchorRule::Adopted,
    })
}

fn replace(
    previous: &DraftRange,
    side: RangeSide,
    changed: DateValue,
    rule: AnchorRule,
) -> AnchorResolution {
    AnchorResolution {
        draft: previous.with(side, Some(changed)).normalized(),
        changed,
        rule,
    }
}

fn is_day(reported: Option<DateValue>, day: DateValue) -> bool {
    reported.is_some_and(|r| r.same_day(day))
}

/// The reported date that is not `kept`.
fn other_than(
    r0: Option<DateValue>,
    r1: Option<DateValue>,
    kept: DateValue,
) -> Option<DateValue> {
    [r0, r1].into_iter().flatten().find(|r| !r.same_day(kept))
}
