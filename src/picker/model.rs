//! Elm-style state model for one picker control.
//!
//! All control state lives in [`PickerModel`]. Host events arrive as
//! [`PickerMsg`] values; side-effects (firing `onChange`, notifications,
//! caret placement, logging) are described by [`PickerCmd`] values returned
//! from [`crate::picker::update::update`].
//!
//! **Design invariant:** the model is deterministic and performs no I/O. Time
//! comes in on messages, never from a clock.

use serde::{Deserialize, Serialize};

use crate::core::config::Config;
use crate::core::errors::Result;
use crate::date::pattern::DisplayPattern;
use crate::date::value::{DateUnit, DateValue};
use crate::logger::jsonl::{EventType, Severity};
use crate::picker::commit::{CommitConstraints, CommitGate, FormattedValue};
use crate::picker::debounce::EventDebouncer;
use crate::picker::input::{InputContext, KeyCode};
use crate::picker::preset::{self, PageDirection, PresetTag};
use crate::picker::schedule::CaretScheduler;
use crate::picker::segment::{CaretTarget, SegmentNavigator};
use crate::picker::store::{DraftRange, Mode, RangeSide, ValueStore};

// ──────────────────── settings ────────────────────

/// Per-control settings resolved from [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerSettings {
    pub mode: Mode,
    pub pattern: DisplayPattern,
    pub max_days: Option<u32>,
    pub default_preset: PresetTag,
    pub offered_presets: Vec<PresetTag>,
    /// Key passed to `onChange` in single-date mode.
    pub field_name: String,
    pub disabled: bool,
    pub debounce_ms: u64,
    pub caret_delay_ms: u64,
}

impl PickerSettings {
    /// Resolve settings from a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let picker = &config.picker;
        Ok(Self {
            mode: picker.mode,
            pattern: DisplayPattern::parse(&picker.format)?,
            max_days: picker.max_days,
            default_preset: picker.default_preset,
            offered_presets: picker.offered_presets.clone(),
            field_name: picker.field_name.clone(),
            disabled: picker.disabled,
            debounce_ms: config.timing.debounce_ms,
            caret_delay_ms: config.timing.caret_delay_ms,
        })
    }

    /// Defaults for a given mode.
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        let mut config = Config::default();
        config.picker.mode = mode;
        Self::from_config(&config).unwrap_or_else(|_| Self {
            mode,
            pattern: DisplayPattern::iso(),
            max_days: None,
            default_preset: PresetTag::Custom,
            offered_presets: PresetTag::ALL.to_vec(),
            field_name: "date".to_string(),
            disabled: false,
            debounce_ms: crate::picker::debounce::DEFAULT_DEBOUNCE_MS,
            caret_delay_ms: crate::picker::schedule::DEFAULT_CARET_DELAY_MS,
        })
    }

    #[must_use]
    pub fn offers(&self, tag: PresetTag) -> bool {
        self.offered_presets.contains(&tag)
    }
}

// ──────────────────── host-facing values ────────────────────

/// First argument of the host's `onChange`: the field name in single-date
/// mode, the active preset in range mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChangeKey {
    Preset(PresetTag),
    Field(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Calendar panel granularity reported by the calendar widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelMode {
    Date,
    Week,
    Month,
    Year,
}

/// A loggable fact. The runtime stamps time, mode and preset.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub event: EventType,
    pub severity: Severity,
    pub value: Option<FormattedValue>,
    pub error_code: Option<&'static str>,
    pub details: Option<String>,
}

impl LogRecord {
    #[must_use]
    pub const fn info(event: EventType) -> Self {
        Self {
            event,
            severity: Severity::Info,
            value: None,
            error_code: None,
            details: None,
        }
    }

    #[must_use]
    pub const fn warning(event: EventType) -> Self {
        Self {
            event,
            severity: Severity::Warning,
            value: None,
            error_code: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: FormattedValue) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub const fn with_code(mut self, code: &'static str) -> Self {
        self.error_code = Some(code);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

// ──────────────────── messages ────────────────────

/// Events delivered to the control.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerMsg {
    /// Clock advance; delivers due caret moves.
    Tick { now_ms: u64 },
    /// Popover opened or closed by the calendar widget.
    OpenChange { open: bool },
    /// Calendar click: full reported pair plus the widget's side hint.
    CalendarChange {
        dates: DraftRange,
        side: Option<RangeSide>,
        at_ms: u64,
    },
    PanelModeChange(PanelMode),
    /// Key press in a text field with the caret at `caret`.
    Key {
        key: KeyCode,
        field: RangeSide,
        caret: usize,
        at_ms: u64,
    },
    /// A text field gained focus.
    Focus {
        field: RangeSide,
        caret: usize,
        at_ms: u64,
    },
    Blur,
    /// Current text of a field after typing or paste.
    TextInput { field: RangeSide, text: String },
    SelectPreset(PresetTag),
    Page(PageDirection),
    Confirm,
    /// Controlled `value` prop changed.
    ValueProp(FormattedValue),
    /// Imperative `initDatePicker(preset, start, end)`.
    Init {
        preset: PresetTag,
        start: Option<DateValue>,
        end: Option<DateValue>,
    },
    /// Imperative `focus()`.
    FocusControl { at_ms: u64 },
    SetToday(DateValue),
    /// Control unmounted.
    Dispose,
}

impl PickerMsg {
    /// Whether the message originates from user interaction (and is
    /// therefore ignored while the control is disabled).
    #[must_use]
    pub const fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::OpenChange { .. }
                | Self::CalendarChange { .. }
                | Self::Key { .. }
                | Self::Focus { .. }
                | Self::TextInput { .. }
                | Self::SelectPreset(_)
                | Self::Page(_)
                | Self::Confirm
                | Self::FocusControl { .. }
        )
    }
}

// ──────────────────── commands ────────────────────

/// Side-effects for the runtime to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerCmd {
    None,
    Batch(Vec<PickerCmd>),
    /// Invoke the host's `onChange(key, value)`.
    EmitChange {
        key: ChangeKey,
        value: FormattedValue,
    },
    /// Show a transient notification.
    Notify {
        level: NotificationLevel,
        message: String,
    },
    /// Focus a field and select a segment.
    ApplyCaret(CaretTarget),
    /// Deliver a `Tick` after this many milliseconds.
    ScheduleTick { after_ms: u64 },
    /// Ask the calendar widget to open or close the popover.
    SetPopover(bool),
    Log(LogRecord),
}

impl PickerCmd {
    /// Combine commands, dropping `None` and collapsing single entries.
    #[must_use]
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| *c != Self::None).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }

    /// Flatten into a list of leaf commands.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::None => Vec::new(),
            Self::Batch(cmds) => cmds.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}

// ──────────────────── model ────────────────────

/// Complete state of one control instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerModel {
    pub settings: PickerSettings,
    pub store: ValueStore,
    pub gate: CommitGate,
    pub navigator: SegmentNavigator,
    pub debouncer: EventDebouncer,
    pub caret: CaretScheduler,
    pub preset: PresetTag,
    pub panel_mode: Option<PanelMode>,
    pub popover_open: bool,
    pub today: DateValue,
    pub now_ms: u64,
    /// Last value the host is known to hold, for suppressing repeat emits.
    pub last_emitted: Option<(ChangeKey, FormattedValue)>,
    pub disposed: bool,
}

impl PickerModel {
    #[must_use]
    pub fn new(settings: PickerSettings, today: DateValue) -> Self {
        let store = ValueStore::new(settings.mode);
        let gate = CommitGate::new(
            CommitConstraints {
                max_days: settings.max_days,
            },
            settings.pattern.clone(),
        );
        let navigator = SegmentNavigator::new(settings.mode, settings.pattern.clone());
        let preset = match settings.mode {
            Mode::Range => settings.default_preset,
            Mode::Single => PresetTag::Custom,
        };
        Self {
            debouncer: EventDebouncer::new(settings.debounce_ms),
            caret: CaretScheduler::new(settings.caret_delay_ms),
            store,
            gate,
            navigator,
            preset,
            panel_mode: None,
            popover_open: false,
            today,
            now_ms: 0,
            last_emitted: None,
            disposed: false,
            settings,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.settings.mode
    }

    #[must_use]
    pub const fn input_context(&self) -> InputContext {
        InputContext {
            popover_open: self.popover_open,
            disabled: self.settings.disabled,
        }
    }

    /// Key the host's `onChange` receives for the current state.
    #[must_use]
    pub fn change_key(&self) -> ChangeKey {
        match self.settings.mode {
            Mode::Single => ChangeKey::Field(self.settings.field_name.clone()),
            Mode::Range => ChangeKey::Preset(self.preset),
        }
    }

    /// Committed value as the host sees it.
    #[must_use]
    pub fn formatted(&self) -> FormattedValue {
        self.gate.format(&self.store.committed())
    }

    /// Record the current committed value as already known to the host.
    pub fn mark_host_synced(&mut self) {
        self.last_emitted = Some((self.change_key(), self.formatted()));
    }

    /// Text for the preset trigger. On a month or year panel, a committed
    /// range covering exactly one calendar month or year renders as that
    /// period's name.
    #[must_use]
    pub fn trigger_label(&self) -> String {
        let range = self.store.committed().as_draft();
        if let (Some(start), Some(end)) = (range.start, range.end) {
            let whole = |unit: DateUnit| start == start.start_of(unit) && end == start.end_of(unit);
            match self.panel_mode {
                Some(PanelMode::Year) if whole(DateUnit::Year) => return start.format_with("%Y"),
                Some(PanelMode::Month) if whole(DateUnit::Month) => {
                    return start.format_with("%B %Y");
                }
                _ => {}
            }
        }
        preset::preset_label(self.preset, &range, self.navigator.pattern())
    }
}
