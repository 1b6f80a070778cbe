//! Command executor and imperative handle for one picker control.
//!
//! [`PickerRuntime`] feeds messages through [`update`], then executes the
//! returned [`PickerCmd`] tree against a [`PickerHost`] and the optional JSONL
//! activity log. Hosts own real timers; the runtime only records when the
//! next `Tick` is due so deterministic drivers can call [`PickerRuntime::advance`].

#![allow(missing_docs)]

use serde::Serialize;

use crate::core::config::Config;
use crate::core::errors::Result;
use crate::date::value::DateValue;
use crate::logger::jsonl::{JsonlConfig, JsonlWriter, LogEntry};
use crate::picker::commit::FormattedValue;
use crate::picker::model::{
    ChangeKey, LogRecord, NotificationLevel, PickerCmd, PickerModel, PickerMsg, PickerSettings,
};
use crate::picker::preset::PresetTag;
use crate::picker::segment::CaretTarget;
use crate::picker::store::Mode;
use crate::picker::update::update;

/// Host-side effects. Every method has a no-op default.
pub trait PickerHost {
    /// The host's `onChange(key, value)`.
    fn on_change(&mut self, _key: &ChangeKey, _value: &FormattedValue) {}

    /// Show a transient notification.
    fn notify(&mut self, _level: NotificationLevel, _message: &str) {}

    /// Focus a field and select a caret range.
    fn apply_caret(&mut self, _target: &CaretTarget) {}

    /// Open or close the calendar popover.
    fn set_popover(&mut self, _open: bool) {}

    /// Arrange for a `Tick` to be delivered after `after_ms`.
    fn schedule_tick(&mut self, _after_ms: u64) {}
}

/// Host that records every effect, for tests, replay and the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordingHost {
    pub changes: Vec<(ChangeKey, FormattedValue)>,
    pub notifications: Vec<(NotificationLevel, String)>,
    pub carets: Vec<CaretTarget>,
    pub popover: Vec<bool>,
    pub ticks: Vec<u64>,
}

impl PickerHost for RecordingHost {
    fn on_change(&mut self, key: &ChangeKey, value: &FormattedValue) {
        self.changes.push((key.clone(), value.clone()));
    }

    fn notify(&mut self, level: NotificationLevel, message: &str) {
        self.notifications.push((level, message.to_string()));
    }

    fn apply_caret(&mut self, target: &CaretTarget) {
        self.carets.push(*target);
    }

    fn set_popover(&mut self, open: bool) {
        self.popover.push(open);
    }

    fn schedule_tick(&mut self, after_ms: u64) {
        self.ticks.push(after_ms);
    }
}

/// One control instance bound to a host.
#[derive(Debug)]
pub struct PickerRuntime<H: PickerHost> {
    model: PickerModel,
    host: H,
    log: Option<JsonlWriter>,
    config_hash: Option<String>,
    tick_due_at: Option<u64>,
}

impl<H: PickerHost> PickerRuntime<H> {
    #[must_use]
    pub fn new(settings: PickerSettings, today: DateValue, host: H) -> Self {
        Self {
            model: PickerModel::new(settings, today),
            host,
            log: None,
            config_hash: None,
            tick_due_at: None,
        }
    }

    /// Build from configuration, opening the activity log if enabled.
    pub fn from_config(config: &Config, today: DateValue, host: H) -> Result<Self> {
        let mut runtime = Self::new(PickerSettings::from_config(config)?, today, host);
        runtime.config_hash = Some(config.stable_hash()?);
        if config.logging.enabled {
            runtime.log = Some(JsonlWriter::open(JsonlConfig::from(&config.logging)));
        }
        Ok(runtime)
    }

    /// Attach an activity log.
    #[must_use]
    pub fn with_log(mut self, writer: JsonlWriter) -> Self {
        self.log = Some(writer);
        self
    }

    /// Feed one message through the reducer and execute the result.
    pub fn dispatch(&mut self, msg: PickerMsg) {
        let cmd = update(&mut self.model, msg);
        self.execute(cmd);
    }

    /// Deliver a tick if one is due at `now_ms`.
    pub fn advance(&mut self, now_ms: u64) {
        if self.tick_due_at.is_some_and(|due| due <= now_ms) {
            self.tick_due_at = None;
            self.dispatch(PickerMsg::Tick { now_ms });
        }
    }

    /// Imperative `initDatePicker(preset, start, end)`.
    pub fn init_date_picker(
        &mut self,
        preset: PresetTag,
        start: Option<DateValue>,
        end: Option<DateValue>,
    ) {
        self.dispatch(PickerMsg::Init { preset, start, end });
    }

    /// Imperative `focus()`.
    pub fn focus(&mut self, at_ms: u64) {
        self.dispatch(PickerMsg::FocusControl { at_ms });
    }

    #[must_use]
    pub const fn model(&self) -> &PickerModel {
        &self.model
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Label for the preset trigger, following the calendar panel.
    #[must_use]
    pub fn trigger_label(&self) -> String {
        self.model.trigger_label()
    }

    #[must_use]
    pub const fn tick_due_at(&self) -> Option<u64> {
        self.tick_due_at
    }

    #[must_use]
    pub fn into_host(mut self) -> H {
        if let Some(log) = self.log.as_mut() {
            log.flush();
        }
        self.host
    }

    fn execute(&mut self, cmd: PickerCmd) {
        for leaf in cmd.flatten() {
            match leaf {
                PickerCmd::None | PickerCmd::Batch(_) => {}
                PickerCmd::EmitChange { key, value } => self.host.on_change(&key, &value),
                PickerCmd::Notify { level, message } => self.host.notify(level, &message),
                PickerCmd::ApplyCaret(target) => self.host.apply_caret(&target),
                PickerCmd::ScheduleTick { after_ms } => {
                    self.tick_due_at = Some(self.model.now_ms.saturating_add(after_ms));
                    self.host.schedule_tick(after_ms);
                }
                PickerCmd::SetPopover(open) => self.host.set_popover(open),
                PickerCmd::Log(record) => self.write_log(record),
            }
        }
    }

    fn write_log(&mut self, record: LogRecord) {
        let Some(log) = self.log.as_mut() else {
            return;
        };
        let mut entry = LogEntry::new(record.event, record.severity);
        entry.mode = Some(self.model.mode());
        if self.model.mode() == Mode::Range {
            entry.preset = Some(self.model.preset);
        }
        entry.value = record.value;
        entry.error_code = record.error_code.map(str::to_string);
        entry.config_hash.clone_from(&self.config_hash);
        entry.details = record.details;
        log.write_entry(&entry);
    }
}

impl PickerRuntime<RecordingHost> {
    /// Runtime with a recording host, for tests and replay.
    #[must_use]
    pub fn recording(settings: PickerSettings, today: DateValue) -> Self {
        Self::new(settings, today, RecordingHost::default())
    }
}
