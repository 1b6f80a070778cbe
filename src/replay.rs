//! Replay of recorded interaction scripts.
//!
//! A script is JSON lines, one [`ReplayEvent`] per line, tagged by `type`.
//! Blank lines and lines starting with `#` are skipped. Each event becomes a
//! [`PickerMsg`] dispatched through a [`PickerRuntime`] with a
//! [`RecordingHost`], so the report shows exactly what a host would have seen.

#![allow(missing_docs)]

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::{PickerError, Result};
use crate::date::value::DateValue;
use crate::picker::commit::FormattedValue;
use crate::picker::input::KeyCode;
use crate::picker::model::{PanelMode, PickerMsg, PickerSettings};
use crate::picker::preset::{PageDirection, PresetTag};
use crate::picker::runtime::{PickerRuntime, RecordingHost};
use crate::picker::store::{DraftRange, Mode, RangeSide};

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    Open,
    Close,
    Calendar {
        #[serde(default)]
        start: Option<DateValue>,
        #[serde(default)]
        end: Option<DateValue>,
        #[serde(default)]
        side: Option<RangeSide>,
        at_ms: u64,
    },
    Panel {
        mode: PanelMode,
    },
    Key {
        key: KeyCode,
        field: RangeSide,
        #[serde(default)]
        caret: usize,
        #[serde(default)]
        at_ms: u64,
    },
    Text {
        field: RangeSide,
        text: String,
    },
    Focus {
        field: RangeSide,
        #[serde(default)]
        caret: usize,
        #[serde(default)]
        at_ms: u64,
    },
    Blur,
    Preset {
        preset: PresetTag,
    },
    Page {
        direction: PageDirection,
    },
    Confirm,
    Value {
        value: FormattedValue,
    },
    Init {
        preset: PresetTag,
        #[serde(default)]
        start: Option<DateValue>,
        #[serde(default)]
        end: Option<DateValue>,
    },
    FocusControl {
        #[serde(default)]
        at_ms: u64,
    },
    Tick {
        now_ms: u64,
    },
}

impl ReplayEvent {
    /// Message for this event. `Tick` is handled by the runtime clock instead.
    fn into_msg(self) -> Option<PickerMsg> {
        let msg = match self {
            Self::Open => PickerMsg::OpenChange { open: true },
            Self::Close => PickerMsg::OpenChange { open: false },
            Self::Calendar {
                start,
                end,
                side,
                at_ms,
            } => PickerMsg::CalendarChange {
                dates: DraftRange::new(start, end),
                side,
                at_ms,
            },
            Self::Panel { mode } => PickerMsg::PanelModeChange(mode),
            Self::Key {
                key,
                field,
                caret,
                at_ms,
            } => PickerMsg::Key {
                key,
                field,
                caret,
                at_ms,
            },
            Self::Text { field, text } => PickerMsg::TextInput { field, text },
            Self::Focus {
                field,
                caret,
                at_ms,
            } => PickerMsg::Focus {
                field,
                caret,
                at_ms,
            },
            Self::Blur => PickerMsg::Blur,
            Self::Preset { preset } => PickerMsg::SelectPreset(preset),
            Self::Page { direction } => PickerMsg::Page(direction),
            Self::Confirm => PickerMsg::Confirm,
            Self::Value { value } => PickerMsg::ValueProp(value),
            Self::Init { preset, start, end } => PickerMsg::Init { preset, start, end },
            Self::FocusControl { at_ms } => PickerMsg::FocusControl { at_ms },
            Self::Tick { .. } => return None,
        };
        Some(msg)
    }
}

/// Outcome of replaying a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub events: usize,
    pub mode: Mode,
    /// Active preset at the end (range mode).
    pub preset: Option<PresetTag>,
    /// Committed value at the end, formatted.
    pub committed: FormattedValue,
    /// Preset trigger label at the end.
    pub label: String,
    pub host: RecordingHost,
}

/// Parse a JSONL script.
pub fn parse_script(raw: &str) -> Result<Vec<ReplayEvent>> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|error| PickerError::Serialization {
                context: "replay script",
                details: format!("line {}: {error}", idx + 1),
            })
        })
        .collect()
}

/// Read and parse a script file.
pub fn load_script(path: &Path) -> Result<Vec<ReplayEvent>> {
    let raw = fs::read_to_string(path).map_err(|source| PickerError::io(path, source))?;
    parse_script(&raw)
}

/// Replay events through a fresh runtime.
#[must_use]
pub fn replay(settings: PickerSettings, today: DateValue, events: Vec<ReplayEvent>) -> ReplayReport {
    let mut runtime = PickerRuntime::recording(settings, today);
    replay_into(&mut runtime, events)
}

/// Replay events through an existing runtime (e.g. one with a log attached).
pub fn replay_into(
    runtime: &mut PickerRuntime<RecordingHost>,
    events: Vec<ReplayEvent>,
) -> ReplayReport {
    let count = events.len();
    for event in events {
        if let ReplayEvent::Tick { now_ms } = event {
            runtime.advance(now_ms);
            continue;
        }
        if let Some(msg) = event.into_msg() {
            runtime.dispatch(msg);
        }
    }

    let model = runtime.model();
    ReplayReport {
        events: count,
        mode: model.mode(),
        preset: (model.mode() == Mode::Range).then_some(model.preset),
        committed: model.formatted(),
        label: model.trigger_label(),
        host: runtime.host().clone(),
    }
}
