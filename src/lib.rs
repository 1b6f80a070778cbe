#![forbid(unsafe_code)]

//! Date and date-range picker interaction engine (`drp`).
//!
//! The engine owns everything between raw widget events and the host's
//! `onChange` callback:
//! 1. **Anchor resolution**: infer which endpoint a calendar click moved
//! 2. **Segment navigation**: caret-aware year/month/day editing of masked inputs
//! 3. **Presets and paging**: today/week/month/year periods and prev/next shifts
//! 4. **Commit gate**: draft vs. committed state with range-length validation
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use daterange_picker::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use daterange_picker::core::config::Config;
//! use daterange_picker::picker::runtime::{PickerRuntime, RecordingHost};
//! ```

pub mod prelude;

pub mod core;
pub mod date;
pub mod logger;
pub mod picker;
pub mod replay;
