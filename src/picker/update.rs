//! Pure update function for the picker control.
//!
//! `update()` takes the current model and a message, mutates the model, and
//! returns a command describing any side-effects the runtime should execute.
//!
//! **Design invariant:** this module performs zero I/O. Draft changes go
//! through [`DraftMutation`]; committed state only changes through the commit
//! gate or the explicit seeding paths (`ValueProp`, `Init`, Delete).

#![allow(clippy::too_many_lines)]

use crate::core::errors::PickerError;
use crate::date::value::DateValue;
use crate::logger::jsonl::EventType;
use crate::picker::anchor::{self, AnchorRule};
use crate::picker::commit::{CommitTrigger, FormattedValue};
use crate::picker::input::{InputAction, KeyCode, resolve_key_event};
use crate::picker::model::{LogRecord, NotificationLevel, PickerCmd, PickerModel, PickerMsg};
use crate::picker::preset::{self, PageDirection, PresetTag};
use crate::picker::segment::{CaretTarget, Entry, Horizontal, endpoint_for, parse_entry};
use crate::picker::store::{CommittedValue, DraftMutation, DraftRange, Mode, RangeSide};

/// Apply a message to the model and return the next command for the runtime.
pub fn update(model: &mut PickerModel, msg: PickerMsg) -> PickerCmd {
    if model.disposed {
        return PickerCmd::None;
    }
    if model.settings.disabled && msg.is_user_input() {
        return PickerCmd::None;
    }

    match msg {
        PickerMsg::Tick { now_ms } => {
            model.now_ms = now_ms;
            let applied = model.caret.take_due(now_ms).map_or(PickerCmd::None, PickerCmd::ApplyCaret);
            let again = model
                .caret
                .due_in(now_ms)
                .map_or(PickerCmd::None, |after_ms| PickerCmd::ScheduleTick { after_ms });
            PickerCmd::batch(vec![applied, again])
        }

        PickerMsg::OpenChange { open: true } => {
            model.popover_open = true;
            model.store.reset();
            PickerCmd::None
        }

        PickerMsg::OpenChange { open: false } => close_popover(model),

        PickerMsg::CalendarChange { dates, side, at_ms } => {
            model.now_ms = at_ms;
            if !model.debouncer.admit(at_ms) {
                return PickerCmd::Log(
                    LogRecord::info(EventType::Debounced)
                        .with_details(format!("calendar change at {at_ms}ms inside window")),
                );
            }
            calendar_change(model, dates, side)
        }

        PickerMsg::PanelModeChange(mode) => {
            model.panel_mode = Some(mode);
            PickerCmd::None
        }

        PickerMsg::Key {
            key,
            field,
            caret,
            at_ms,
        } => {
            model.now_ms = at_ms;
            handle_key(model, key, field, caret)
        }

        PickerMsg::Focus {
            field,
            caret,
            at_ms,
        } => {
            model.now_ms = at_ms;
            model.navigator.focus(field, caret);
            PickerCmd::None
        }

        PickerMsg::Blur => {
            model.navigator.blur();
            model.caret.cancel();
            PickerCmd::None
        }

        PickerMsg::TextInput { field, text } => text_input(model, field, &text),

        PickerMsg::SelectPreset(tag) => select_preset(model, tag),

        PickerMsg::Page(direction) => page(model, direction),

        PickerMsg::Confirm => confirm(model),

        PickerMsg::ValueProp(value) => seed_from_host(model, &value),

        PickerMsg::Init { preset, start, end } => {
            if model.mode() == Mode::Range {
                model.preset = preset;
            }
            model.store.seed(DraftRange::new(start, end));
            model.mark_host_synced();
            PickerCmd::Log(
                LogRecord::info(EventType::Init)
                    .with_value(model.formatted())
                    .with_details(format!("preset={preset}")),
            )
        }

        PickerMsg::FocusControl { at_ms } => {
            model.now_ms = at_ms;
            let target = model.navigator.caret_to_segment(RangeSide::Start, 0);
            schedule_caret(model, target)
        }

        PickerMsg::SetToday(today) => {
            model.today = today;
            PickerCmd::None
        }

        PickerMsg::Dispose => {
            model.caret.cancel();
            model.navigator.blur();
            model.popover_open = false;
            model.disposed = true;
            PickerCmd::None
        }
    }
}

// ──────────────────── popover ────────────────────

fn close_popover(model: &mut PickerModel) -> PickerCmd {
    model.popover_open = false;
    model.caret.cancel();
    model.navigator.blur();

    match model.mode() {
        Mode::Single if model.store.draft().start.is_some() => {
            let draft = model.store.draft();
            commit(model, draft, CommitTrigger::CloseSingle)
        }
        _ => discard_draft(model),
    }
}

/// Close without committing.
fn dismiss(model: &mut PickerModel) -> PickerCmd {
    model.popover_open = false;
    model.caret.cancel();
    PickerCmd::batch(vec![discard_draft(model), PickerCmd::SetPopover(false)])
}

fn discard_draft(model: &mut PickerModel) -> PickerCmd {
    if model.store.draft() == model.store.committed().as_draft() {
        return PickerCmd::None;
    }
    model.store.reset();
    PickerCmd::Log(LogRecord::info(EventType::Reset).with_value(model.formatted()))
}

// ──────────────────── calendar ────────────────────

fn calendar_change(
    model: &mut PickerModel,
    dates: DraftRange,
    side: Option<RangeSide>,
) -> PickerCmd {
    if model.mode() == Mode::Single {
        let Some(date) = dates.start.or(dates.end) else {
            return unresolved("calendar reported no date");
        };
        model.store.apply(DraftMutation::SetEndpoint {
            side: RangeSide::Start,
            value: Some(date),
        });
        return PickerCmd::None;
    }

    let previous = model.store.draft();
    let resolution = anchor::resolve(&previous, &dates, side);

    if model.preset != PresetTag::Custom {
        let Some(clicked) = resolution
            .map(|r| r.changed)
            .or(dates.start)
            .or(dates.end)
        else {
            return unresolved("calendar reported no date");
        };
        let Some(range) = preset::preset_range_for(model.preset, clicked) else {
            return PickerCmd::None;
        };
        let committed = commit(model, range, CommitTrigger::Preset);
        return close_after_commit(model, committed);
    }

    let Some(resolution) = resolution else {
        return unresolved("no single endpoint change could be inferred");
    };
    if !model.store.apply(DraftMutation::Replace(resolution.draft)) {
        return PickerCmd::None;
    }
    let event = if resolution.rule == AnchorRule::AmbiguousAnchor {
        EventType::AmbiguousAnchor
    } else {
        EventType::AnchorResolved
    };
    PickerCmd::Log(LogRecord::info(event).with_details(format!(
        "rule={} changed={}",
        rule_name(resolution.rule),
        resolution.changed
    )))
}

fn unresolved(reason: &str) -> PickerCmd {
    PickerCmd::Log(LogRecord::info(EventType::UnresolvedEvent).with_details(reason))
}

const fn rule_name(rule: AnchorRule) -> &'static str {
    match rule {
        AnchorRule::Adopted => "adopted",
        AnchorRule::SingleDayExpand => "single_day_expand",
        AnchorRule::AmbiguousAnchor => "ambiguous_anchor",
        AnchorRule::StartMoved => "start_moved",
        AnchorRule::EndMoved => "end_moved",
        AnchorRule::Confirmed => "confirmed",
    }
}

// ──────────────────── keyboard ────────────────────

fn handle_key(model: &mut PickerModel, key: KeyCode, field: RangeSide, caret: usize) -> PickerCmd {
    let resolution = resolve_key_event(key, model.input_context());
    let Some(action) = resolution.action else {
        return PickerCmd::None;
    };

    match action {
        InputAction::MoveSegment(direction) => move_segment(model, field, caret, direction),
        InputAction::Step(delta) => step_segment(model, field, caret, delta),
        InputAction::ClearField => clear_field(model, field, caret),
        InputAction::Confirm => confirm(model),
        InputAction::Cancel => dismiss(model),
        InputAction::OpenPopover => {
            model.popover_open = true;
            model.store.reset();
            PickerCmd::SetPopover(true)
        }
    }
}

fn move_segment(
    model: &mut PickerModel,
    field: RangeSide,
    caret: usize,
    direction: Horizontal,
) -> PickerCmd {
    let target = model.navigator.on_arrow(field, caret, direction);
    schedule_caret(model, target)
}

fn step_segment(model: &mut PickerModel, field: RangeSide, caret: usize, delta: i64) -> PickerCmd {
    model.navigator.focus(field, caret);
    let pending = model.navigator.pending();
    let field = pending.field.unwrap_or(RangeSide::Start);
    let Some(current) = model.store.draft().get(field) else {
        return PickerCmd::None;
    };
    let stepped = model.navigator.step(current, delta);
    model.store.apply(DraftMutation::SetEndpoint {
        side: field,
        value: Some(stepped),
    });
    let target = model.navigator.caret_to_segment(field, pending.segment);
    schedule_caret(model, target)
}

fn clear_field(model: &mut PickerModel, field: RangeSide, caret: usize) -> PickerCmd {
    model.navigator.focus(field, caret);
    let field = model.navigator.pending().field.unwrap_or(RangeSide::Start);
    match model.mode() {
        Mode::Single => {
            model.store.apply(DraftMutation::SetEndpoint {
                side: field,
                value: None,
            });
            PickerCmd::None
        }
        Mode::Range => {
            model.store.clear_endpoint(field);
            emit_if_changed(model)
        }
    }
}

fn text_input(model: &mut PickerModel, field: RangeSide, text: &str) -> PickerCmd {
    let endpoint = endpoint_for(model.mode(), field);
    let date = match parse_entry(text, model.navigator.pattern(), endpoint) {
        Ok(Entry::Partial) => return PickerCmd::None,
        Ok(Entry::Complete(date)) => date,
        Err(err) => return reject(&err, EventType::InvalidInput),
    };

    let side = match model.mode() {
        Mode::Single => RangeSide::Start,
        Mode::Range => field,
    };
    model.store.apply(DraftMutation::SetEndpoint {
        side,
        value: Some(date),
    });

    let draft = model.store.draft();
    match model.mode() {
        Mode::Single => commit(model, draft, CommitTrigger::FullEntry),
        Mode::Range if draft.is_complete() => {
            commit_under(model, PresetTag::Custom, draft, CommitTrigger::FullEntry)
        }
        Mode::Range => PickerCmd::None,
    }
}

// ──────────────────── presets & paging ────────────────────

fn select_preset(model: &mut PickerModel, tag: PresetTag) -> PickerCmd {
    if !model.settings.offers(tag) {
        return PickerCmd::Log(
            LogRecord::warning(EventType::PresetApplied)
                .with_details(format!("preset {tag} is not offered")),
        );
    }

    match model.mode() {
        Mode::Single => {
            if tag != PresetTag::Today {
                return PickerCmd::None;
            }
            let today = model.today;
            commit(model, DraftRange::new(Some(today), None), CommitTrigger::Preset)
        }
        Mode::Range => {
            let Some(range) = preset::preset_range_for(tag, model.today) else {
                model.preset = tag;
                return PickerCmd::Log(
                    LogRecord::info(EventType::PresetApplied).with_details("preset=custom"),
                );
            };
            commit_under(model, tag, range, CommitTrigger::Preset)
        }
    }
}

fn page(model: &mut PickerModel, direction: PageDirection) -> PickerCmd {
    let next = match model.store.committed() {
        CommittedValue::Single(Some(date)) => {
            DraftRange::new(Some(preset::shift_date(date, direction)), None)
        }
        CommittedValue::Single(None) => return PickerCmd::None,
        CommittedValue::Range(range) => {
            let shifted = preset::shift_period(model.preset, range, direction);
            if shifted == range {
                return PickerCmd::None;
            }
            shifted
        }
    };
    commit(model, next, CommitTrigger::Paging)
}

// ──────────────────── commit ────────────────────

fn confirm(model: &mut PickerModel) -> PickerCmd {
    let draft = model.store.draft();
    let committed = commit(model, draft, CommitTrigger::Confirm);
    close_after_commit(model, committed)
}

/// Close the popover if the commit went through; a rejected commit keeps it
/// open so the user can fix the range.
fn close_after_commit(model: &mut PickerModel, committed: PickerCmd) -> PickerCmd {
    let rejected = committed
        .clone()
        .flatten()
        .iter()
        .any(|c| matches!(c, PickerCmd::Notify { .. }));
    if rejected {
        return committed;
    }
    model.popover_open = false;
    model.caret.cancel();
    PickerCmd::batch(vec![committed, PickerCmd::SetPopover(false)])
}

fn commit(model: &mut PickerModel, draft: DraftRange, trigger: CommitTrigger) -> PickerCmd {
    try_commit(model, draft, trigger).unwrap_or_else(|rejected| rejected)
}

/// Commit with `tag` as the active preset. The preset only sticks when the
/// gate accepts the value; a rejection leaves the previous preset in place.
fn commit_under(
    model: &mut PickerModel,
    tag: PresetTag,
    draft: DraftRange,
    trigger: CommitTrigger,
) -> PickerCmd {
    let previous = model.preset;
    model.preset = tag;
    try_commit(model, draft, trigger).unwrap_or_else(|rejected| {
        model.preset = previous;
        rejected
    })
}

fn try_commit(
    model: &mut PickerModel,
    draft: DraftRange,
    trigger: CommitTrigger,
) -> Result<PickerCmd, PickerCmd> {
    match model.gate.try_commit(&mut model.store, draft) {
        Ok(outcome) => {
            let log = LogRecord::info(EventType::Commit)
                .with_value(outcome.formatted)
                .with_details(format!("trigger={}", trigger_name(trigger)));
            Ok(PickerCmd::batch(vec![PickerCmd::Log(log), emit_if_changed(model)]))
        }
        Err(err) => Err(reject(&err, EventType::CommitRejected)),
    }
}

const fn trigger_name(trigger: CommitTrigger) -> &'static str {
    match trigger {
        CommitTrigger::Confirm => "confirm",
        CommitTrigger::FullEntry => "full_entry",
        CommitTrigger::Preset => "preset",
        CommitTrigger::Paging => "paging",
        CommitTrigger::CloseSingle => "close_single",
    }
}

fn reject(err: &PickerError, event: EventType) -> PickerCmd {
    PickerCmd::batch(vec![
        PickerCmd::Notify {
            level: NotificationLevel::Warning,
            message: err.user_message(),
        },
        PickerCmd::Log(
            LogRecord::warning(event)
                .with_code(err.code())
                .with_details(err.to_string()),
        ),
    ])
}

/// Fire `onChange` unless the host already holds this exact key and value.
fn emit_if_changed(model: &mut PickerModel) -> PickerCmd {
    let key = model.change_key();
    let value = model.formatted();
    if model
        .last_emitted
        .as_ref()
        .is_some_and(|(k, v)| *k == key && *v == value)
    {
        return PickerCmd::None;
    }
    model.last_emitted = Some((key.clone(), value.clone()));
    PickerCmd::EmitChange { key, value }
}

fn schedule_caret(model: &mut PickerModel, target: CaretTarget) -> PickerCmd {
    model.caret.schedule(target, model.now_ms);
    PickerCmd::ScheduleTick {
        after_ms: model.caret.delay_ms(),
    }
}

// ──────────────────── controlled value ────────────────────

fn seed_from_host(model: &mut PickerModel, value: &FormattedValue) -> PickerCmd {
    let pattern = model.navigator.pattern();
    let current = model.store.committed().as_draft();
    let mut invalid = Vec::new();
    // Empty clears the endpoint; anything unparseable keeps the committed one.
    let mut parse = |raw: &str, kept: Option<DateValue>| -> Option<DateValue> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let parsed = pattern
            .parse_date(raw)
            .or_else(|| DateValue::parse_compact(raw));
        if parsed.is_none() {
            invalid.push(raw.to_string());
            return kept;
        }
        parsed
    };
    let range = match value {
        FormattedValue::Single(raw) => DraftRange::new(parse(raw, current.start), None),
        FormattedValue::Range([start, end]) => DraftRange::new(
            parse(start, current.start),
            parse(end, current.end),
        ),
    };

    model.store.seed(range);
    model.mark_host_synced();

    if invalid.is_empty() {
        PickerCmd::None
    } else {
        PickerCmd::Log(
            LogRecord::warning(EventType::ValueSeeded)
                .with_details(format!("ignored unparseable value(s): {invalid:?}")),
        )
    }
}
