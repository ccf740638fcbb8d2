//! Drift Core Primitives
//!
//! This crate provides the foundational primitives for the Drift motion
//! engine:
//!
//! - **Motion Values**: observable scalars with epsilon-gated change
//!   notification
//! - **Range Transforms**: pure interpolation from a domain onto a codomain,
//!   two-point or piecewise
//! - **Subscriptions**: scoped observer registration, released on drop
//!
//! # Example
//!
//! ```rust
//! use drift_core::{MapRange, MotionValue, Readable, Transform};
//!
//! // A normalized pointer coordinate in [-0.5, 0.5]
//! let pointer_x = MotionValue::new(0.0);
//!
//! // Derive a parallax offset from it
//! let parallax = Transform::new(
//!     pointer_x.clone(),
//!     MapRange::new([-0.5, 0.5], [-24.0, 24.0]).unwrap(),
//! );
//!
//! pointer_x.set(0.5);
//! assert_eq!(parallax.get(), 24.0);
//! ```

pub mod transform;
pub mod value;

pub use transform::{Computed, MapRange, MapStops, Mapping, RangeError, Transform};
pub use value::{
    MotionValue, Readable, Subscriber, SubscriberId, Subscription, VALUE_EPSILON,
};
