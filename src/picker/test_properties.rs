//! Property-based tests for picker reducer invariants.
//!
//! Arbitrary message sequences must keep committed ranges ordered, repeated
//! commits must be idempotent, presets must contain their anchor, and custom
//! paging must preserve span.

use proptest::prelude::*;

use super::model::{PickerModel, PickerMsg, PickerSettings};
use super::preset::{self, PageDirection, PresetTag};
use super::store::{CommittedValue, DraftRange, Mode, RangeSide};
use super::update::update;
use crate::date::value::DateValue;
use crate::picker::input::KeyCode;

// ──────────────────── strategies ────────────────────

fn arb_date() -> impl Strategy<Value = DateValue> {
    (0i64..3_000).prop_map(|offset| {
        DateValue::from_ymd(2020, 1, 1)
            .expect("valid base date")
            .add_days(offset)
    })
}

fn arb_side() -> impl Strategy<Value = RangeSide> {
    prop_oneof![Just(RangeSide::Start), Just(RangeSide::End)]
}

fn arb_preset() -> impl Strategy<Value = PresetTag> {
    prop_oneof![
        Just(PresetTag::Today),
        Just(PresetTag::Week),
        Just(PresetTag::Month),
        Just(PresetTag::Year),
        Just(PresetTag::Custom),
    ]
}

fn arb_direction() -> impl Strategy<Value = PageDirection> {
    prop_oneof![Just(PageDirection::Prev), Just(PageDirection::Next)]
}

fn arb_key() -> impl Strategy<Value = KeyCode> {
    prop_oneof![
        Just(KeyCode::Left),
        Just(KeyCode::Right),
        Just(KeyCode::Up),
        Just(KeyCode::Down),
        Just(KeyCode::Delete),
        Just(KeyCode::Enter),
        Just(KeyCode::Escape),
    ]
}

fn arb_msg() -> impl Strategy<Value = PickerMsg> {
    prop_oneof![
        any::<bool>().prop_map(|open| PickerMsg::OpenChange { open }),
        (
            proptest::option::of(arb_date()),
            proptest::option::of(arb_date()),
            proptest::option::of(arb_side()),
            0u64..100,
        )
            .prop_map(|(a, b, side, step)| PickerMsg::CalendarChange {
                dates: DraftRange::new(a, b),
                side,
                at_ms: step * 7,
            }),
        (arb_key(), arb_side(), 0usize..11).prop_map(|(key, field, caret)| PickerMsg::Key {
            key,
            field,
            caret,
            at_ms: 0,
        }),
        (arb_side(), arb_date()).prop_map(|(field, date)| PickerMsg::TextInput {
            field,
            text: date.to_string(),
        }),
        arb_preset().prop_map(PickerMsg::SelectPreset),
        arb_direction().prop_map(PickerMsg::Page),
        Just(PickerMsg::Confirm),
        (0u64..1_000).prop_map(|now_ms| PickerMsg::Tick { now_ms }),
    ]
}

fn model(mode: Mode) -> PickerModel {
    PickerModel::new(
        PickerSettings::for_mode(mode),
        DateValue::from_ymd(2025, 6, 11).expect("valid today"),
    )
}

fn ordered(value: CommittedValue) -> bool {
    match value {
        CommittedValue::Range(DraftRange {
            start: Some(a),
            end: Some(b),
        }) => a <= b,
        _ => true,
    }
}

// ──────────────────── properties ────────────────────

proptest! {
    #[test]
    fn committed_range_is_always_ordered(msgs in prop::collection::vec(arb_msg(), 1..60)) {
        let mut m = model(Mode::Range);
        for msg in msgs {
            update(&mut m, msg);
            prop_assert!(ordered(m.store.committed()));
        }
    }

    #[test]
    fn single_mode_never_holds_an_end_date(msgs in prop::collection::vec(arb_msg(), 1..60)) {
        let mut m = model(Mode::Single);
        for msg in msgs {
            update(&mut m, msg);
            prop_assert_eq!(m.store.draft().end, None);
            prop_assert!(matches!(m.store.committed(), CommittedValue::Single(_)));
        }
    }

    #[test]
    fn confirming_twice_leaves_value_unchanged(a in arb_date(), b in arb_date()) {
        let mut m = model(Mode::Range);
        m.store.seed(DraftRange::between(a, b));
        update(&mut m, PickerMsg::Confirm);
        let first = m.store.committed();
        update(&mut m, PickerMsg::Confirm);
        prop_assert_eq!(first, m.store.committed());
    }

    #[test]
    fn preset_range_contains_anchor(tag in arb_preset(), anchor in arb_date()) {
        if let Some(range) = preset::preset_range_for(tag, anchor) {
            let (start, end) = (range.start.expect("start"), range.end.expect("end"));
            prop_assert!(start <= anchor && anchor <= end);
        } else {
            prop_assert_eq!(tag, PresetTag::Custom);
        }
    }

    #[test]
    fn custom_paging_preserves_span(a in arb_date(), b in arb_date(), dir in arb_direction()) {
        let current = DraftRange::between(a, b).normalized();
        let shifted = preset::shift_period(PresetTag::Custom, current, dir);
        prop_assert_eq!(shifted.span_days(), current.span_days());
        let (start, end) = (current.start.expect("start"), current.end.expect("end"));
        let (next_start, next_end) = (shifted.start.expect("start"), shifted.end.expect("end"));
        match dir {
            PageDirection::Next => prop_assert_eq!(next_start, end.add_days(1)),
            PageDirection::Prev => prop_assert_eq!(next_end, start.add_days(-1)),
        }
    }

    #[test]
    fn debounced_events_never_change_draft(a in arb_date(), b in arb_date(), gap in 0u64..=10) {
        let mut m = model(Mode::Range);
        update(&mut m, PickerMsg::CalendarChange {
            dates: DraftRange::between(a, a),
            side: Some(RangeSide::Start),
            at_ms: 1_000,
        });
        let before = m.store.draft();
        update(&mut m, PickerMsg::CalendarChange {
            dates: DraftRange::between(a, b),
            side: Some(RangeSide::End),
            at_ms: 1_000 + gap,
        });
        prop_assert_eq!(before, m.store.draft());
    }
}
