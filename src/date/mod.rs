//! Calendar primitives: date values and display patterns.

pub mod pattern;
pub mod value;
