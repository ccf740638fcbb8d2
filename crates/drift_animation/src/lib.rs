//! Drift Animation System
//!
//! Spring physics and frame scheduling for the Drift motion engine.
//!
//! # Features
//!
//! - **Spring Physics**: semi-implicit Euler springs with stiffness,
//!   damping, mass and the `gentle`/`rigid` presets
//! - **Frame Scheduling**: one driver advances every active node per frame;
//!   settled nodes cost nothing until retargeted
//! - **Velocity Tracking**: per-tick time-derivatives for speed-reactive
//!   effects
//! - **Interruptible**: springs inherit position and velocity when
//!   retargeted mid-flight

pub mod scheduler;
pub mod spring;
pub mod spring_value;
pub mod velocity;

pub use scheduler::{FrameScheduler, SchedulerHandle, SharedTickable, TickId, Tickable, MIN_DT};
pub use spring::{Spring, SpringConfig, POSITION_EPSILON, VELOCITY_EPSILON};
pub use spring_value::SpringValue;
pub use velocity::VelocityTracker;
