//! Velocity tracking
//!
//! A [`VelocityTracker`] publishes the time-derivative of a source value,
//! recomputed once per scheduler tick so every reader within a frame sees
//! the same number. Sampling on the tick rather than on read keeps results
//! independent of caller timing.

use crate::scheduler::{SchedulerHandle, TickId, Tickable, MIN_DT};
use drift_core::{MotionValue, Readable, Subscriber, Subscription};
use std::sync::{Arc, Mutex};

struct VelocityEntry {
    source: Box<dyn Readable>,
    last: f32,
    output: MotionValue,
}

impl Tickable for VelocityEntry {
    fn tick(&mut self, dt: f32) {
        let current = self.source.get();
        let velocity = (current - self.last) / dt.max(MIN_DT);
        self.last = current;
        self.output.set(velocity);
    }
}

/// Per-tick time-derivative of a source, in units per second
pub struct VelocityTracker {
    id: TickId,
    scheduler: SchedulerHandle,
    output: MotionValue,
}

impl VelocityTracker {
    pub fn new(scheduler: &SchedulerHandle, source: impl Readable + 'static) -> Self {
        let output = MotionValue::new(0.0);
        let entry = Arc::new(Mutex::new(VelocityEntry {
            last: source.get(),
            source: Box::new(source),
            output: output.clone(),
        }));
        let id = scheduler.register(entry);
        Self {
            id,
            scheduler: scheduler.clone(),
            output,
        }
    }

    /// The output value the tracker publishes into
    pub fn output(&self) -> MotionValue {
        self.output.clone()
    }
}

impl Readable for VelocityTracker {
    fn get(&self) -> f32 {
        self.output.get()
    }

    fn subscribe(&self, subscriber: Subscriber) -> Subscription {
        self.output.subscribe(subscriber)
    }
}

impl Drop for VelocityTracker {
    fn drop(&mut self) {
        self.scheduler.unregister(self.id);
    }
}
