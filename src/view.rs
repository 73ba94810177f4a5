//! Panel-facing view of the store: groups laid out as tabs
//!
//! Groups keep their insertion order, except the ungrouped bucket which is
//! always listed last under [`DEFAULT_GROUP_ID`].

use crate::store::{Knob, KnobGroups, UNGROUPED};

/// Tab label for the ungrouped bucket
pub const DEFAULT_GROUP_ID: &str = "Other";

/// One tab worth of knobs
#[derive(Debug, Clone, PartialEq)]
pub struct GroupView {
    /// Group id in the store (`""` for the ungrouped bucket)
    pub id: String,
    /// Tab title
    pub title: String,
    /// Knobs in insertion order
    pub knobs: Vec<Knob>,
}

impl GroupView {
    /// Whether this is the ungrouped bucket
    pub fn is_ungrouped(&self) -> bool {
        self.id == UNGROUPED
    }
}

/// Lay out the store's groups as tabs
///
/// With `used_only`, groups without any used knob are skipped.
pub fn group_views(groups: &KnobGroups, used_only: bool) -> Vec<GroupView> {
    let mut views = Vec::with_capacity(groups.len());
    let mut ungrouped = None;

    for (id, group) in groups {
        if used_only && !group.values().any(|knob| knob.used) {
            continue;
        }

        if id == UNGROUPED {
            let knobs = group
                .values()
                .map(|knob| Knob {
                    group_id: UNGROUPED.to_string(),
                    ..knob.clone()
                })
                .collect();
            ungrouped = Some(GroupView {
                id: UNGROUPED.to_string(),
                title: DEFAULT_GROUP_ID.to_string(),
                knobs,
            });
        } else {
            views.push(GroupView {
                id: id.clone(),
                title: id.clone(),
                knobs: group.values().cloned().collect(),
            });
        }
    }

    views.extend(ungrouped);
    views
}
