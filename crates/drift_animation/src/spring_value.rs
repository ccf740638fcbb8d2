//! Spring-backed motion values
//!
//! [`SpringValue`] is the bridge between the pure [`Spring`] integrator and
//! the reactive graph: it registers the spring with a scheduler and
//! publishes each step's position into an output [`MotionValue`]. It can
//! either be retargeted directly or follow a source, in which case every
//! change of the source becomes the spring's new target.

use crate::scheduler::{SchedulerHandle, TickId, Tickable};
use crate::spring::{Spring, SpringConfig};
use drift_core::{MotionValue, Readable, Subscriber, Subscription};
use std::sync::{Arc, Mutex};

struct SpringEntry {
    spring: Spring,
    output: MotionValue,
}

impl Tickable for SpringEntry {
    fn tick(&mut self, dt: f32) {
        self.spring.step(dt);
        self.output.set(self.spring.value());
    }

    fn is_idle(&self) -> bool {
        self.spring.is_settled()
    }
}

/// A scheduler-driven spring publishing into a [`MotionValue`].
///
/// Dropping the value unregisters the spring and releases the source
/// subscription, so teardown is complete on every exit path.
pub struct SpringValue {
    entry: Arc<Mutex<SpringEntry>>,
    id: TickId,
    scheduler: SchedulerHandle,
    output: MotionValue,
    _source: Option<Subscription>,
}

impl SpringValue {
    /// A spring at rest at `initial`, retargeted via [`set_target`].
    ///
    /// [`set_target`]: SpringValue::set_target
    pub fn new(scheduler: &SchedulerHandle, initial: f32, config: SpringConfig) -> Self {
        let output = MotionValue::new(initial);
        let entry = Arc::new(Mutex::new(SpringEntry {
            spring: Spring::new(config, initial),
            output: output.clone(),
        }));
        let id = scheduler.register(entry.clone());
        Self {
            entry,
            id,
            scheduler: scheduler.clone(),
            output,
            _source: None,
        }
    }

    /// A spring that tracks a source. The source's current value is the
    /// starting position; every subsequent change retargets the spring
    /// mid-flight, preserving velocity.
    pub fn follow(
        scheduler: &SchedulerHandle,
        source: &impl Readable,
        config: SpringConfig,
    ) -> Self {
        let mut spring = Self::new(scheduler, source.get(), config);
        let entry = spring.entry.clone();
        let handle = scheduler.clone();
        let id = spring.id;
        spring._source = Some(source.subscribe(Box::new(move |target| {
            let needs_wake = {
                let mut entry = entry.lock().unwrap();
                entry.spring.set_target(target);
                !entry.spring.is_settled()
            };
            if needs_wake {
                handle.wake(id);
            }
        })));
        spring
    }

    /// Retarget the spring without resetting position or velocity
    pub fn set_target(&self, target: f32) {
        let needs_wake = {
            let mut entry = self.entry.lock().unwrap();
            entry.spring.set_target(target);
            !entry.spring.is_settled()
        };
        if needs_wake {
            self.scheduler.wake(self.id);
        }
    }

    pub fn target(&self) -> f32 {
        self.entry.lock().unwrap().spring.target()
    }

    pub fn velocity(&self) -> f32 {
        self.entry.lock().unwrap().spring.velocity()
    }

    pub fn is_settled(&self) -> bool {
        self.entry.lock().unwrap().spring.is_settled()
    }

    /// The output value the spring publishes into, for chaining further
    /// derived nodes off the smoothed position
    pub fn output(&self) -> MotionValue {
        self.output.clone()
    }
}

impl Readable for SpringValue {
    fn get(&self) -> f32 {
        self.output.get()
    }

    fn subscribe(&self, subscriber: Subscriber) -> Subscription {
        self.output.subscribe(subscriber)
    }
}

impl Drop for SpringValue {
    fn drop(&mut self) {
        self.scheduler.unregister(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::FrameScheduler;

    const FRAME_MS: f32 = 1000.0 / 60.0;

    #[test]
    fn publishes_positions_toward_target() {
        let scheduler = FrameScheduler::new();
        let spring = SpringValue::new(&scheduler.handle(), 0.0, SpringConfig::rigid());
        spring.set_target(10.0);

        scheduler.on_frame(FRAME_MS);
        let early = spring.get();
        assert!(early > 0.0 && early < 10.0);

        for _ in 0..300 {
            scheduler.on_frame(FRAME_MS);
        }
        assert!(spring.is_settled());
        assert_eq!(spring.get(), 10.0);
    }

    #[test]
    fn settled_spring_goes_idle_and_wakes_on_retarget() {
        let scheduler = FrameScheduler::new();
        let spring = SpringValue::new(&scheduler.handle(), 0.0, SpringConfig::gentle());
        assert!(!scheduler.is_active());

        spring.set_target(5.0);
        assert!(scheduler.is_active());
        for _ in 0..300 {
            scheduler.on_frame(FRAME_MS);
        }
        assert!(!scheduler.is_active());
    }

    #[test]
    fn follows_a_source_value() {
        let scheduler = FrameScheduler::new();
        let source = MotionValue::new(1.0);
        let spring = SpringValue::follow(&scheduler.handle(), &source, SpringConfig::gentle());
        assert_eq!(spring.get(), 1.0);

        source.set(25.0);
        assert_eq!(spring.target(), 25.0);
        for _ in 0..300 {
            scheduler.on_frame(FRAME_MS);
        }
        assert_eq!(spring.get(), 25.0);
    }

    #[test]
    fn drop_unregisters_from_scheduler() {
        let scheduler = FrameScheduler::new();
        let baseline = scheduler.entry_count();
        let spring = SpringValue::new(&scheduler.handle(), 0.0, SpringConfig::gentle());
        assert_eq!(scheduler.entry_count(), baseline + 1);
        drop(spring);
        assert_eq!(scheduler.entry_count(), baseline);
    }
}
