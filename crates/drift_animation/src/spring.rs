//! Spring physics
//!
//! A single-degree-of-freedom damped oscillator used for perceptual
//! smoothing: values chase their target instead of snapping to it. The
//! integrator is semi-implicit Euler, which stays stable at interactive
//! frame rates and preserves velocity across retargets.

/// Spring physical parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Soft settle, used for parallax drift and hover glow
    pub fn gentle() -> Self {
        Self::new(120.0, 18.0, 0.7)
    }

    /// Tight tracking, used for tilt and scroll-linked transforms
    pub fn rigid() -> Self {
        Self::new(180.0, 20.0, 0.6)
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::gentle()
    }
}

/// Distance from target below which a spring can come to rest
pub const POSITION_EPSILON: f32 = 0.01;
/// Speed below which a spring can come to rest
pub const VELOCITY_EPSILON: f32 = 0.1;
/// Consecutive sub-epsilon steps required before a spring settles
const SETTLE_FRAMES: u32 = 3;

/// A damped harmonic oscillator advanced in discrete time steps.
///
/// The spring never jumps to its target after creation: retargeting
/// mid-flight keeps the current position and velocity, so a moving pointer
/// is tracked without visible snaps.
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    target: f32,
    position: f32,
    velocity: f32,
    settle_streak: u32,
    settled: bool,
}

impl Spring {
    /// Create a spring at rest at `initial`
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            target: initial,
            position: initial,
            velocity: 0.0,
            settle_streak: 0,
            settled: true,
        }
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if self.settled {
            return;
        }

        let spring_force = -self.config.stiffness * (self.position - self.target);
        let damping_force = -self.config.damping * self.velocity;
        let acceleration = (spring_force + damping_force) / self.config.mass;

        // Semi-implicit Euler: velocity first, then position from the new velocity
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;

        let at_rest = (self.position - self.target).abs() < POSITION_EPSILON
            && self.velocity.abs() < VELOCITY_EPSILON;
        if at_rest {
            self.settle_streak += 1;
            if self.settle_streak >= SETTLE_FRAMES {
                self.position = self.target;
                self.velocity = 0.0;
                self.settled = true;
            }
        } else {
            self.settle_streak = 0;
        }
    }

    /// Retarget the spring. Position and velocity carry over, so a spring
    /// mid-flight bends toward the new target instead of restarting.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
        let at_rest = (self.position - target).abs() < POSITION_EPSILON
            && self.velocity.abs() < VELOCITY_EPSILON;
        if at_rest {
            // Sub-epsilon residual, absorb it without waking
            self.position = target;
        } else {
            self.settled = false;
            self.settle_streak = 0;
        }
    }

    pub fn value(&self) -> f32 {
        self.position
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// A settled spring needs no further stepping until retargeted
    pub fn is_settled(&self) -> bool {
        self.settled
    }
}
