//! Knob record type definitions
//!
//! Defines the knob record and the insertion-ordered maps the store is built from.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Knobs of one group, keyed by knob name (insertion ordered)
pub type KnobGroup = IndexMap<String, Knob>;

/// All groups, keyed by group id (insertion ordered)
pub type KnobGroups = IndexMap<String, KnobGroup>;

/// Group id of the ungrouped bucket
pub const UNGROUPED: &str = "";

/// A named, typed, user-editable value
///
/// The store never validates records. Type-specific attributes (`min`, `max`,
/// `step`, `options`, ...) live in `extra` and are flattened on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Knob {
    /// Knob name (unique within its group)
    pub name: String,
    /// Knob type (e.g. "text", "number", "boolean"); open-ended
    #[serde(rename = "type")]
    pub knob_type: String,
    /// Current value
    pub value: Value,
    /// Group the knob belongs to
    #[serde(default)]
    pub group_id: String,
    /// Read or written since the last `mark_all_unused`
    #[serde(default)]
    pub used: bool,
    /// Type-specific attributes
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Knob {
    /// Create an ungrouped, unused knob with no extra attributes
    pub fn new(name: impl Into<String>, knob_type: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            knob_type: knob_type.into(),
            value,
            group_id: UNGROUPED.to_string(),
            used: false,
            extra: Map::new(),
        }
    }

    /// Set the group id
    pub fn in_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = group_id.into();
        self
    }

    /// Add a type-specific attribute
    pub fn with_attr(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Look up a type-specific attribute
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
