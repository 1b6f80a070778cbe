//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use daterange_picker::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{Endpoint, PickerError, Result};

// Dates
pub use crate::date::pattern::DisplayPattern;
pub use crate::date::value::{DateUnit, DateValue};

// Picker
pub use crate::picker::commit::{CommitGate, FormattedValue};
pub use crate::picker::input::KeyCode;
pub use crate::picker::model::{
    ChangeKey, NotificationLevel, PickerCmd, PickerModel, PickerMsg, PickerSettings,
};
pub use crate::picker::preset::{PageDirection, PresetTag, preset_range_for, shift_period};
pub use crate::picker::runtime::{PickerHost, PickerRuntime, RecordingHost};
pub use crate::picker::store::{DraftRange, Mode, RangeSide};
pub use crate::picker::update::update;

// Replay
pub use crate::replay::{ReplayEvent, ReplayReport, replay};
