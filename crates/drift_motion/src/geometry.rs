//! Region geometry
//!
//! The host owns layout; the engine only ever asks for the current bounding
//! rectangle of a tracked region. Rects are re-read on every event so a
//! layout change between events is picked up immediately.

use std::sync::Arc;

/// Identifier the host assigns to a tracked visual region
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionId(pub u64);

/// Bounding rectangle in device pixels, relative to the viewport origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Viewport dimensions in device pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Host-supplied geometry lookups.
///
/// A region that has not mounted yet returns `None`; signal sources treat
/// that as a neutral zero signal rather than an error, since pointer and
/// scroll events can legitimately arrive before layout is ready.
pub trait GeometryProvider: Send + Sync {
    fn bounding_rect(&self, region: RegionId) -> Option<Rect>;
    fn viewport(&self) -> Viewport;
}

/// Shared handle to the host's geometry provider
pub type SharedGeometry = Arc<dyn GeometryProvider>;
