//! Pointer-linked motion profiles
//!
//! Composition recipes over a tracked region's normalized pointer
//! coordinates: each output is a spring following a range transform of the
//! pointer signal. Gentle springs carry the slow positional drift, rigid
//! springs carry the tilt so rotation tracks the pointer tightly.

use crate::geometry::RegionId;
use crate::pointer::PointerTracker;
use crate::runtime::MotionRuntime;
use drift_animation::{SpringConfig, SpringValue};
use drift_core::{MapRange, MotionValue, Transform};

/// Pointer coordinates are normalized to this domain
const POINTER_DOMAIN: [f32; 2] = [-0.5, 0.5];

fn pointer_spring(
    runtime: &MotionRuntime,
    source: &MotionValue,
    codomain: [f32; 2],
    config: SpringConfig,
) -> SpringValue {
    let mapping = MapRange::new(POINTER_DOMAIN, codomain)
        .expect("pointer domain is non-degenerate");
    SpringValue::follow(
        &runtime.handle(),
        &Transform::new(source.clone(), mapping),
        config,
    )
}

/// Hover parallax for a card-like region: the surface drifts toward the
/// pointer while tilting away from it, and an inner layer moves on a
/// shorter throw for depth separation.
pub struct CursorMotion {
    pub parallax_x: SpringValue,
    pub parallax_y: SpringValue,
    pub tilt_x: SpringValue,
    pub tilt_y: SpringValue,
    pub inner_x: SpringValue,
    pub inner_y: SpringValue,
    _tracker: PointerTracker,
}

impl CursorMotion {
    pub fn new(runtime: &MotionRuntime, region: RegionId) -> Self {
        let tracker = runtime.pointer().track(region);
        let x = tracker.x();
        let y = tracker.y();
        Self {
            parallax_x: pointer_spring(runtime, &x, [-24.0, 24.0], SpringConfig::gentle()),
            parallax_y: pointer_spring(runtime, &y, [-16.0, 16.0], SpringConfig::gentle()),
            tilt_x: pointer_spring(runtime, &y, [8.0, -8.0], SpringConfig::rigid()),
            tilt_y: pointer_spring(runtime, &x, [-10.0, 10.0], SpringConfig::rigid()),
            inner_x: pointer_spring(runtime, &x, [-10.0, 10.0], SpringConfig::gentle()),
            inner_y: pointer_spring(runtime, &y, [-6.0, 6.0], SpringConfig::gentle()),
            _tracker: tracker,
        }
    }
}

/// Scene-level camera sway: rigid tilt against the pointer with a gentle
/// positional drift underneath
pub struct CameraTilt {
    pub tilt_x: SpringValue,
    pub tilt_y: SpringValue,
    pub drift_x: SpringValue,
    pub drift_y: SpringValue,
    _tracker: PointerTracker,
}

impl CameraTilt {
    pub fn new(runtime: &MotionRuntime, region: RegionId) -> Self {
        let tracker = runtime.pointer().track(region);
        let x = tracker.x();
        let y = tracker.y();
        Self {
            tilt_x: pointer_spring(runtime, &y, [10.0, -10.0], SpringConfig::rigid()),
            tilt_y: pointer_spring(runtime, &x, [-12.0, 12.0], SpringConfig::rigid()),
            drift_x: pointer_spring(runtime, &x, [-18.0, 18.0], SpringConfig::gentle()),
            drift_y: pointer_spring(runtime, &y, [-12.0, 12.0], SpringConfig::gentle()),
            _tracker: tracker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GeometryProvider, Rect, Viewport};
    use drift_core::Readable;
    use std::sync::Arc;

    struct OneRegion;

    impl GeometryProvider for OneRegion {
        fn bounding_rect(&self, region: RegionId) -> Option<Rect> {
            (region == RegionId(1)).then_some(Rect {
                left: 0.0,
                top: 0.0,
                width: 200.0,
                height: 200.0,
            })
        }

        fn viewport(&self) -> Viewport {
            Viewport {
                width: 1280.0,
                height: 800.0,
            }
        }
    }

    const FRAME_MS: f32 = 1000.0 / 60.0;

    #[test]
    fn pointer_motion_retargets_every_spring() {
        let runtime = MotionRuntime::new(Arc::new(OneRegion));
        let cursor = CursorMotion::new(&runtime, RegionId(1));

        runtime.on_pointer_move(200.0, 200.0);
        assert_eq!(cursor.parallax_x.target(), 24.0);
        assert_eq!(cursor.parallax_y.target(), 16.0);
        assert_eq!(cursor.tilt_x.target(), -8.0);
        assert_eq!(cursor.tilt_y.target(), 10.0);
        assert_eq!(cursor.inner_x.target(), 10.0);
        assert_eq!(cursor.inner_y.target(), 6.0);
    }

    #[test]
    fn tilt_opposes_the_pointer_vertically() {
        let runtime = MotionRuntime::new(Arc::new(OneRegion));
        let camera = CameraTilt::new(&runtime, RegionId(1));

        // Pointer at the top edge tilts the camera up (positive)
        runtime.on_pointer_move(100.0, 0.0);
        assert_eq!(camera.tilt_x.target(), 10.0);

        for _ in 0..300 {
            runtime.on_frame(FRAME_MS);
        }
        assert_eq!(camera.tilt_x.get(), 10.0);
        assert!(!runtime.is_active());
    }

    #[test]
    fn teardown_releases_bindings_and_scheduler_entries() {
        let runtime = MotionRuntime::new(Arc::new(OneRegion));
        let cursor = CursorMotion::new(&runtime, RegionId(1));
        let camera = CameraTilt::new(&runtime, RegionId(1));
        assert_eq!(runtime.pointer().binding_count(), 2);
        assert_eq!(runtime.scheduler().entry_count(), 10);

        drop(cursor);
        drop(camera);
        assert_eq!(runtime.pointer().binding_count(), 0);
        assert_eq!(runtime.scheduler().entry_count(), 0);
    }
}
