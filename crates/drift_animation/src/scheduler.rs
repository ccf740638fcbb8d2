//! Frame scheduler
//!
//! The single per-frame driver. The host reports elapsed time once per
//! animation frame; the scheduler advances every active entry (springs,
//! velocity trackers, wave generators) in registration order and each entry
//! publishes into its output value, which is how transforms and
//! presentation code observe new numbers.
//!
//! Entries that report idle leave the active set and cost nothing per frame
//! until woken by a retarget. The scheduler itself is passive: when the
//! active set is empty the host can pause its frame loop, and the wake
//! callback fires when an idle scheduler becomes active again.
//!
//! Entries must not read each other's mid-tick state. A node chained off
//! another scheduler-driven node's output observes the value published on
//! the frame the upstream node ticked, which is the previous frame's result
//! when the downstream node ticks first. This one-frame lag is a deliberate
//! trade-off that keeps tick order independent of graph topology.

use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, trace};

new_key_type! {
    /// Unique identifier for a scheduler entry
    pub struct TickId;
}

/// Minimum time step in seconds; guards velocity division and degenerate
/// frame deltas
pub const MIN_DT: f32 = 1e-4;

/// A node advanced once per frame by the scheduler
pub trait Tickable: Send {
    /// Advance by `dt` seconds and publish into output values
    fn tick(&mut self, dt: f32);

    /// Idle entries are dropped from the active set until woken
    fn is_idle(&self) -> bool {
        false
    }
}

/// Shared ownership of a scheduler entry
pub type SharedTickable = Arc<Mutex<dyn Tickable>>;

type WakeCallback = Arc<dyn Fn() + Send + Sync>;

struct SchedulerState {
    entries: SlotMap<TickId, SharedTickable>,
    active: FxHashSet<TickId>,
    wake: Option<WakeCallback>,
}

impl SchedulerState {
    fn is_active(&self) -> bool {
        !self.active.is_empty()
    }
}

/// The per-frame driver. Owns the entry registry; clones of its
/// [`SchedulerHandle`] register and wake entries from anywhere.
pub struct FrameScheduler {
    state: Arc<Mutex<SchedulerState>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SchedulerState {
                entries: SlotMap::with_key(),
                active: FxHashSet::default(),
                wake: None,
            })),
        }
    }

    /// Process-wide scheduler, created on first use
    pub fn global() -> &'static FrameScheduler {
        static GLOBAL: OnceLock<FrameScheduler> = OnceLock::new();
        GLOBAL.get_or_init(FrameScheduler::new)
    }

    /// A cloneable handle for registering entries
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            state: self.state.clone(),
        }
    }

    /// Register a callback fired when the idle scheduler gains an active
    /// entry, so the host can resume its frame loop
    pub fn set_wake_callback(&self, wake: impl Fn() + Send + Sync + 'static) {
        self.state.lock().unwrap().wake = Some(Arc::new(wake));
    }

    /// Advance every active entry by the frame's elapsed time.
    ///
    /// Iterates a snapshot of the active set, so entries may register or
    /// unregister from inside notification callbacks; additions join on the
    /// next frame.
    pub fn on_frame(&self, elapsed_ms: f32) {
        let dt = (elapsed_ms / 1000.0).max(MIN_DT);

        let snapshot: Vec<(TickId, SharedTickable)> = {
            let state = self.state.lock().unwrap();
            state
                .entries
                .iter()
                .filter(|(id, _)| state.active.contains(id))
                .map(|(id, node)| (id, node.clone()))
                .collect()
        };

        for (id, node) in snapshot {
            let idle = {
                let mut node = node.lock().unwrap();
                node.tick(dt);
                node.is_idle()
            };
            if idle {
                let mut state = self.state.lock().unwrap();
                state.active.remove(&id);
                if !state.is_active() {
                    trace!("scheduler idle");
                }
            }
        }
    }

    /// Whether any entry still needs per-frame advancement
    pub fn is_active(&self) -> bool {
        self.state.lock().unwrap().is_active()
    }

    /// Total registered entries, active or idle
    pub fn entry_count(&self) -> usize {
        self.state.lock().unwrap().entries.len()
    }

    /// Entries currently in the active set
    pub fn active_count(&self) -> usize {
        self.state.lock().unwrap().active.len()
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable registration handle onto a [`FrameScheduler`]
#[derive(Clone)]
pub struct SchedulerHandle {
    state: Arc<Mutex<SchedulerState>>,
}

impl SchedulerHandle {
    /// Register an entry. Entries that report idle on arrival wait outside
    /// the active set until woken.
    pub fn register(&self, node: SharedTickable) -> TickId {
        let idle = node.lock().unwrap().is_idle();
        let (id, callback) = {
            let mut state = self.state.lock().unwrap();
            let was_active = state.is_active();
            let id = state.entries.insert(node);
            if !idle {
                state.active.insert(id);
            }
            trace!("scheduler entry registered, {} total", state.entries.len());
            let callback = if !idle && !was_active {
                state.wake.clone()
            } else {
                None
            };
            (id, callback)
        };
        if let Some(callback) = callback {
            debug!("scheduler woke on registration");
            callback();
        }
        id
    }

    /// Remove an entry from the registry and the active set
    pub fn unregister(&self, id: TickId) {
        let mut state = self.state.lock().unwrap();
        state.entries.remove(id);
        state.active.remove(&id);
        trace!("scheduler entry removed, {} remain", state.entries.len());
    }

    /// Return an idle entry to the active set (e.g. after a retarget)
    pub fn wake(&self, id: TickId) {
        let callback = {
            let mut state = self.state.lock().unwrap();
            if !state.entries.contains_key(id) {
                return;
            }
            let was_active = state.is_active();
            state.active.insert(id);
            if was_active {
                None
            } else {
                state.wake.clone()
            }
        };
        if let Some(callback) = callback {
            debug!("scheduler woke from idle");
            callback();
        }
    }
}
