//! KnobStore - Grouped knob values with debounced change notification
//!
//! Stores knob records per group, tracks which knobs are in use, and notifies
//! subscribers once writes have gone quiet for the debounce window.

use super::debounce::{Debouncer, DEFAULT_DEBOUNCE_MS};
use super::types::{Knob, KnobGroups, UNGROUPED};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Change notification callback
///
/// Identity is the `Arc` allocation: keep a clone to unsubscribe later.
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Stores knobs per group and notifies subscribers after writes settle
///
/// Cloning yields another handle to the same store.
#[derive(Clone)]
pub struct KnobStore {
    /// Knob records per group, insertion ordered
    groups: Arc<RwLock<KnobGroups>>,
    /// Subscribers, in registration order
    callbacks: Arc<RwLock<Vec<Callback>>>,
    /// Pending change notification
    debouncer: Debouncer,
}

impl KnobStore {
    /// Create an empty store with the default 50ms debounce window
    pub fn new() -> Self {
        Self::with_debounce(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }

    /// Create an empty store with a custom debounce window
    pub fn with_debounce(delay: Duration) -> Self {
        Self {
            groups: Arc::new(RwLock::new(KnobGroups::new())),
            callbacks: Arc::new(RwLock::new(Vec::new())),
            debouncer: Debouncer::new(delay),
        }
    }

    /// Debounce window applied to change notifications
    pub fn debounce(&self) -> Duration {
        self.debouncer.delay()
    }

    /// Whether a change notification is scheduled but has not fired yet
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Whether a knob exists at exactly this path (does not mark it used)
    pub fn has(&self, group_id: &str, name: &str) -> bool {
        self.groups
            .read()
            .get(group_id)
            .is_some_and(|group| group.contains_key(name))
    }

    /// Store a knob, mark it used, and (re)schedule the change notification
    ///
    /// Creates the group on first use. Overwriting an existing knob keeps its
    /// position within the group. Any pending notification is cancelled; the
    /// next one fires once no `set` has happened for the debounce window.
    pub fn set(&self, group_id: &str, name: &str, mut knob: Knob) {
        knob.used = true;

        {
            let mut groups = self.groups.write();
            groups
                .entry(group_id.to_string())
                .or_default()
                .insert(name.to_string(), knob);
        }
        debug!("Set knob {:?}/{:?}", group_id, name);

        let callbacks = Arc::clone(&self.callbacks);
        self.debouncer.rearm(move || notify_all(&callbacks));
    }

    /// Get a knob and mark it used
    ///
    /// `None` as the group id means the ungrouped bucket. Returns `None` when
    /// the group or knob is missing.
    pub fn get<'a>(&self, group_id: impl Into<Option<&'a str>>, name: &str) -> Option<Knob> {
        let group_id = group_id.into().unwrap_or(UNGROUPED);
        let mut groups = self.groups.write();
        let knob = groups.get_mut(group_id)?.get_mut(name)?;
        knob.used = true;
        trace!("Get knob {:?}/{:?}", group_id, name);
        Some(knob.clone())
    }

    /// Borrow the live store for reading
    ///
    /// The guard blocks writers (including `set` and `get`) until dropped.
    pub fn get_all(&self) -> RwLockReadGuard<'_, KnobGroups> {
        self.groups.read()
    }

    /// Borrow the live store for direct mutation
    ///
    /// Changes made through the guard bypass `used` tracking and do not
    /// schedule a change notification.
    pub fn get_all_mut(&self) -> RwLockWriteGuard<'_, KnobGroups> {
        self.groups.write()
    }

    /// Knob names of a group, in insertion order
    pub fn names(&self, group_id: &str) -> Vec<String> {
        self.groups
            .read()
            .get(group_id)
            .map(|group| group.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Drop every group and knob
    ///
    /// Subscribers stay registered and a pending notification still fires.
    pub fn reset(&self) {
        *self.groups.write() = KnobGroups::new();
        debug!("Knob store reset");
    }

    /// Clear the `used` flag on every knob
    pub fn mark_all_unused(&self) {
        let mut groups = self.groups.write();
        groups
            .values_mut()
            .flat_map(|group| group.values_mut())
            .for_each(|knob| knob.used = false);
        trace!("Marked all knobs unused");
    }

    /// Register a change callback (duplicates allowed)
    pub fn subscribe(&self, callback: Callback) {
        self.callbacks.write().push(callback);
    }

    /// Register a closure and return the handle needed to unsubscribe it
    pub fn subscribe_fn<F>(&self, listener: F) -> Callback
    where
        F: Fn() + Send + Sync + 'static,
    {
        let callback: Callback = Arc::new(listener);
        self.subscribe(Arc::clone(&callback));
        callback
    }

    /// Remove the first registration of `callback`; unknown callbacks are ignored
    pub fn unsubscribe(&self, callback: &Callback) {
        let mut callbacks = self.callbacks.write();
        if let Some(index) = callbacks.iter().position(|cb| Arc::ptr_eq(cb, callback)) {
            callbacks.remove(index);
        }
    }

    /// Number of registered callbacks
    pub fn subscriber_count(&self) -> usize {
        self.callbacks.read().len()
    }
}

impl Default for KnobStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Invoke every callback registered at this moment, in order
///
/// Runs on a snapshot of the registry so callbacks may subscribe, unsubscribe
/// or `set` without deadlocking.
fn notify_all(callbacks: &RwLock<Vec<Callback>>) {
    let snapshot: Vec<Callback> = callbacks.read().clone();
    debug!("Notifying {} knob subscribers", snapshot.len());
    for callback in &snapshot {
        callback();
    }
}
