//! Jitter profile
//!
//! A continuous low-amplitude wave for idle hover life: two out-of-phase
//! sinusoids whose amplitude is read from a source value each tick, so an
//! amplitude spring can fade the wobble in and out smoothly.

use drift_animation::{SchedulerHandle, TickId, Tickable};
use drift_core::{MotionValue, Readable};
use std::sync::{Arc, Mutex};

const X_FREQUENCY: f32 = 3.2;
const Y_FREQUENCY: f32 = 2.6;

struct JitterWave {
    time: f32,
    phase: f32,
    amplitude: Box<dyn Readable>,
    x: MotionValue,
    y: MotionValue,
}

impl Tickable for JitterWave {
    fn tick(&mut self, dt: f32) {
        self.time += dt;
        let amplitude = self.amplitude.get();
        self.x
            .set((self.time * X_FREQUENCY + self.phase).sin() * amplitude);
        self.y
            .set((self.time * Y_FREQUENCY + self.phase).cos() * amplitude);
    }
}

/// Continuous wobble around the origin, scaled by a live amplitude source.
///
/// The wave stays registered (and the scheduler active) for the profile's
/// whole lifetime; drop it to stop paying per-frame cost. `phase` offsets
/// neighbouring instances so they do not move in lockstep.
pub struct Jitter {
    x: MotionValue,
    y: MotionValue,
    id: TickId,
    scheduler: SchedulerHandle,
}

impl Jitter {
    pub fn new(
        scheduler: &SchedulerHandle,
        amplitude: impl Readable + 'static,
        phase: f32,
    ) -> Self {
        let x = MotionValue::new(0.0);
        let y = MotionValue::new(0.0);
        let id = scheduler.register(Arc::new(Mutex::new(JitterWave {
            time: 0.0,
            phase,
            amplitude: Box::new(amplitude),
            x: x.clone(),
            y: y.clone(),
        })));
        Self {
            x,
            y,
            id,
            scheduler: scheduler.clone(),
        }
    }

    pub fn x(&self) -> MotionValue {
        self.x.clone()
    }

    pub fn y(&self) -> MotionValue {
        self.y.clone()
    }
}

impl Drop for Jitter {
    fn drop(&mut self) {
        self.scheduler.unregister(self.id);
    }
}
