//! Reactive motion values
//!
//! `MotionValue` is the base primitive of the engine: a shared observable
//! scalar. Every other node (transforms, springs, velocity trackers, signal
//! sources) either is one or publishes into one. Change notification is
//! synchronous and epsilon-gated so a frame full of no-op writes never fans
//! out to subscribers.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::sync::{Arc, Mutex, Weak};

new_key_type! {
    /// Unique identifier for a subscriber attached to a motion value
    pub struct SubscriberId;
}

/// Callback invoked with the new value after a change
pub type Subscriber = Box<dyn Fn(f32) + Send + Sync>;

/// Writes closer to the current value than this do not notify subscribers
pub const VALUE_EPSILON: f32 = 1e-6;

/// The read capability shared by every node in the motion graph.
///
/// Composition code is written against this trait, not against concrete node
/// kinds: anything that can report a current value and notify on change can
/// drive a spring target, a transform, or presentation code.
pub trait Readable: Send + Sync {
    /// Current value, read synchronously
    fn get(&self) -> f32;

    /// Register a change callback. The returned [`Subscription`] removes the
    /// callback when dropped.
    fn subscribe(&self, subscriber: Subscriber) -> Subscription;
}

type SharedSubscriber = Arc<dyn Fn(f32) + Send + Sync>;

struct ValueInner {
    current: Mutex<f32>,
    subscribers: Mutex<SlotMap<SubscriberId, SharedSubscriber>>,
}

/// A shared observable scalar.
///
/// Handles are cheap to clone; all clones observe the same state. Writes from
/// inside a subscriber callback are allowed and simply re-trigger dependents
/// (the graph is acyclic by construction, so this terminates).
#[derive(Clone)]
pub struct MotionValue {
    inner: Arc<ValueInner>,
}

impl MotionValue {
    pub fn new(initial: f32) -> Self {
        Self {
            inner: Arc::new(ValueInner {
                current: Mutex::new(initial),
                subscribers: Mutex::new(SlotMap::with_key()),
            }),
        }
    }

    pub fn get(&self) -> f32 {
        *self.inner.current.lock().unwrap()
    }

    /// Update the value, notifying subscribers if it changed beyond
    /// [`VALUE_EPSILON`]. Notification is synchronous and iterates a snapshot
    /// of the subscriber list, so callbacks may subscribe, unsubscribe, or
    /// write other values re-entrantly.
    pub fn set(&self, value: f32) {
        {
            let mut current = self.inner.current.lock().unwrap();
            if (*current - value).abs() <= VALUE_EPSILON {
                return;
            }
            *current = value;
        }
        self.notify(value);
    }

    fn notify(&self, value: f32) {
        let snapshot: SmallVec<[SharedSubscriber; 4]> = {
            let subscribers = self.inner.subscribers.lock().unwrap();
            subscribers.values().cloned().collect()
        };
        for subscriber in snapshot {
            subscriber(value);
        }
    }

    /// Number of live subscriptions on this value
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().unwrap().len()
    }
}

impl Readable for MotionValue {
    fn get(&self) -> f32 {
        MotionValue::get(self)
    }

    fn subscribe(&self, subscriber: Subscriber) -> Subscription {
        let id = {
            let mut subscribers = self.inner.subscribers.lock().unwrap();
            subscribers.insert(Arc::from(subscriber))
        };
        Subscription::single(SubscriberGuard {
            value: Arc::downgrade(&self.inner),
            id,
        })
    }
}

impl std::fmt::Debug for MotionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionValue")
            .field("current", &self.get())
            .finish()
    }
}

struct SubscriberGuard {
    value: Weak<ValueInner>,
    id: SubscriberId,
}

impl Drop for SubscriberGuard {
    fn drop(&mut self) {
        if let Some(inner) = self.value.upgrade() {
            if let Ok(mut subscribers) = inner.subscribers.lock() {
                subscribers.remove(self.id);
            }
        }
    }
}

/// Scoped handle to one or more registered subscribers.
///
/// Dropping the subscription removes every callback it owns; holding it keeps
/// them alive. Derived nodes that observe several sources return a single
/// merged subscription covering all of them.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    guards: SmallVec<[SubscriberGuard; 1]>,
}

impl Subscription {
    fn single(guard: SubscriberGuard) -> Self {
        Self {
            guards: SmallVec::from_iter([guard]),
        }
    }

    /// Combine several subscriptions into one guard
    pub fn merge(subscriptions: impl IntoIterator<Item = Subscription>) -> Self {
        let mut guards = SmallVec::new();
        for subscription in subscriptions {
            guards.extend(subscription.guards);
        }
        Self { guards }
    }

    /// Explicitly release all owned subscribers (equivalent to dropping)
    pub fn unsubscribe(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn get_returns_latest_set() {
        let value = MotionValue::new(1.0);
        assert_eq!(value.get(), 1.0);
        value.set(2.5);
        assert_eq!(value.get(), 2.5);
    }

    #[test]
    fn clones_share_state() {
        let value = MotionValue::new(0.0);
        let alias = value.clone();
        value.set(7.0);
        assert_eq!(alias.get(), 7.0);
    }

    #[test]
    fn set_within_epsilon_notifies_at_most_once() {
        let value = MotionValue::new(0.0);
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_probe = calls.clone();
        let _sub = value.subscribe(Box::new(move |_| {
            calls_probe.fetch_add(1, Ordering::SeqCst);
        }));

        value.set(5.0);
        value.set(5.0);
        value.set(5.0 + VALUE_EPSILON / 2.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscriber_receives_new_value() {
        let value = MotionValue::new(0.0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_probe = seen.clone();
        let _sub = value.subscribe(Box::new(move |v| {
            seen_probe.lock().unwrap().push(v);
        }));

        value.set(1.0);
        value.set(-3.0);
        assert_eq!(*seen.lock().unwrap(), vec![1.0, -3.0]);
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let value = MotionValue::new(0.0);
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_probe = calls.clone();
        let sub = value.subscribe(Box::new(move |_| {
            calls_probe.fetch_add(1, Ordering::SeqCst);
        }));

        value.set(1.0);
        drop(sub);
        value.set(2.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(value.subscriber_count(), 0);
    }

    #[test]
    fn reentrant_set_from_callback_does_not_deadlock() {
        let source = MotionValue::new(0.0);
        let derived = MotionValue::new(0.0);
        let derived_writer = derived.clone();
        let _sub = source.subscribe(Box::new(move |v| {
            derived_writer.set(v * 2.0);
        }));

        source.set(4.0);
        assert_eq!(derived.get(), 8.0);
    }

    #[test]
    fn reentrant_subscribe_from_callback_does_not_corrupt_registry() {
        let value = MotionValue::new(0.0);
        let parked: Arc<Mutex<Vec<Subscription>>> = Arc::new(Mutex::new(Vec::new()));
        let parked_writer = parked.clone();
        let value_inner = value.clone();
        let _sub = value.subscribe(Box::new(move |_| {
            let late = value_inner.subscribe(Box::new(|_| {}));
            parked_writer.lock().unwrap().push(late);
        }));

        value.set(1.0);
        assert_eq!(value.subscriber_count(), 2);
        value.set(2.0);
        assert_eq!(value.subscriber_count(), 3);
    }

    #[test]
    fn merged_subscription_releases_all_guards() {
        let a = MotionValue::new(0.0);
        let b = MotionValue::new(0.0);
        let sub_a = a.subscribe(Box::new(|_| {}));
        let sub_b = b.subscribe(Box::new(|_| {}));

        let merged = Subscription::merge([sub_a, sub_b]);
        assert_eq!(a.subscriber_count(), 1);
        assert_eq!(b.subscriber_count(), 1);

        merged.unsubscribe();
        assert_eq!(a.subscriber_count(), 0);
        assert_eq!(b.subscriber_count(), 0);
    }
}
