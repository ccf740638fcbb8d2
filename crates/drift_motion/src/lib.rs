//! Drift Motion Layer
//!
//! Environment adapters and composed motion profiles for the Drift engine:
//!
//! - **Signal Sources**: shared pointer and scroll fan-out publishing
//!   normalized coordinates and span progress
//! - **Runtime**: one facade owning the scheduler and hubs, driven by the
//!   host's events and frame clock
//! - **Profiles**: parallax, tilt, scroll-depth, section, and jitter
//!   recipes wired from the core primitives
//!
//! The host supplies geometry ([`GeometryProvider`]) and drives the inbound
//! signal API ([`MotionRuntime::on_pointer_move`], [`MotionRuntime::on_scroll`],
//! [`MotionRuntime::on_frame`]); presentation code reads the resulting
//! numbers through the `Readable` handles each profile exposes.

pub mod geometry;
pub mod pointer;
pub mod profiles;
pub mod runtime;
pub mod scroll;

pub use geometry::{GeometryProvider, Rect, RegionId, SharedGeometry, Viewport};
pub use pointer::{PointerHub, PointerTracker};
pub use profiles::{
    CameraTilt, CursorMotion, Jitter, ScrollDepth, ScrollDepthConfig, SectionMotion,
    SectionMotionConfig,
};
pub use runtime::MotionRuntime;
pub use scroll::{ScrollHub, ScrollOffsets, ScrollTracker};
