//! Knobs - grouped, debounced settings store for component-development panels
//!
//! A host panel stores ad-hoc named values ("knobs") per group through
//! [`KnobStore`], reads them back (marking them used), and re-renders when the
//! store's debounced change notification fires.

pub mod cli;
pub mod config;
pub mod error;
pub mod store;
pub mod view;

pub use config::KnobsConfig;
pub use error::KnobsError;
pub use store::{Callback, Knob, KnobGroup, KnobGroups, KnobStore, DEFAULT_DEBOUNCE_MS, UNGROUPED};
pub use view::{group_views, GroupView, DEFAULT_GROUP_ID};
