//! Composed motion profiles
//!
//! Named combinations of trackers, transforms, and springs, one per visual
//! effect. Profiles are composition recipes, not machinery: they wire the
//! primitives together and own the resulting subscriptions and scheduler
//! registrations, releasing everything on drop.

pub mod cursor;
pub mod depth;
pub mod jitter;

pub use cursor::{CameraTilt, CursorMotion};
pub use depth::{ScrollDepth, ScrollDepthConfig, SectionMotion, SectionMotionConfig};
pub use jitter::Jitter;
