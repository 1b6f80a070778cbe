//! Picker interaction engine.
//!
//! Stable seams: `store/anchor/debounce/segment/preset/commit/schedule/input`
//! hold the domain rules, `model/update` the deterministic state core, and
//! `runtime` executes commands against a host.

pub mod anchor;
pub mod commit;
pub mod debounce;
pub mod input;
pub mod model;
pub mod preset;
pub mod runtime;
pub mod schedule;
pub mod segment;
pub mod store;
pub mod update;

#[cfg(test)]
mod test_properties;
