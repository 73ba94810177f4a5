//! Knob store module - grouped knob values with debounced change notification
//!
//! This module provides the store a host panel reads and writes knobs through.
//! Knobs are grouped by id, kept in insertion order, flagged as used when read
//! or written, and subscribers are notified once writes have settled.

mod debounce;
mod knob_store;
mod types;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE_MS};
pub use knob_store::{Callback, KnobStore};
pub use types::{Knob, KnobGroup, KnobGroups, UNGROUPED};
