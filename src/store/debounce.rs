//! Cancel-and-rearm debounce timer
//!
//! Every call to [`Debouncer::rearm`] cancels the pending timer (if any) and
//! schedules a fresh one on the tokio runtime. The action only runs once the
//! window elapses with no further rearm, so a burst of triggers collapses into
//! a single run after the last one.
//!
//! Each armed timer carries a generation number. A timer task that wakes up
//! after being superseded sees a newer generation and exits without running
//! its action, even if the abort raced with the wake-up.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

/// Default debounce window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 50;

struct TimerState {
    /// Incremented on every rearm
    generation: u64,
    /// Armed timer task, `None` once it fired
    handle: Option<JoinHandle<()>>,
}

/// Single-slot debounce timer
///
/// Cheap to clone; clones share the same slot.
#[derive(Clone)]
pub struct Debouncer {
    delay: Duration,
    state: Arc<Mutex<TimerState>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: Arc::new(Mutex::new(TimerState {
                generation: 0,
                handle: None,
            })),
        }
    }

    /// Debounce window
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a timer is armed and has not fired yet
    pub fn is_pending(&self) -> bool {
        self.state.lock().handle.is_some()
    }

    /// Cancel the pending timer and arm a new one that runs `action` after the window
    ///
    /// Without a tokio runtime nothing is scheduled and a warning is logged.
    pub fn rearm<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No tokio runtime available, change notification skipped");
                return;
            }
        };

        let mut state = self.state.lock();
        if let Some(previous) = state.handle.take() {
            previous.abort();
            trace!("Cancelled pending timer (generation {})", state.generation);
        }

        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;
        let shared = Arc::clone(&self.state);
        let delay = self.delay;

        trace!("Armed timer (generation {}, {:?})", generation, delay);
        state.handle = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            {
                let mut state = shared.lock();
                if state.generation != generation {
                    trace!("Timer generation {} superseded, skipping", generation);
                    return;
                }
                state.handle = None;
            }

            // Lock released: the action may rearm this debouncer.
            action();
        }));
    }
}
