//! Pointer signal source
//!
//! One shared pointer-move entry point fans out to every tracked region,
//! instead of one listener per consumer. Each event re-reads the region's
//! bounding rect and publishes normalized coordinates in `[-0.5, 0.5]`,
//! where `(0, 0)` is the region's center.

use crate::geometry::{RegionId, SharedGeometry};
use drift_core::MotionValue;
use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex, Weak};
use tracing::trace;

new_key_type! {
    /// Unique identifier for a pointer binding
    pub struct PointerBindingId;
}

struct PointerBinding {
    region: RegionId,
    x: MotionValue,
    y: MotionValue,
}

type PointerBindings = SlotMap<PointerBindingId, PointerBinding>;

/// Shared pointer-move fan-out over all tracked regions
#[derive(Clone)]
pub struct PointerHub {
    geometry: SharedGeometry,
    bindings: Arc<Mutex<PointerBindings>>,
}

impl PointerHub {
    pub fn new(geometry: SharedGeometry) -> Self {
        Self {
            geometry,
            bindings: Arc::new(Mutex::new(SlotMap::with_key())),
        }
    }

    /// The single shared entry point for pointer-move events, in device
    /// pixel coordinates.
    ///
    /// Iterates a snapshot of the bindings so trackers may be created or
    /// dropped from inside a subscriber callback.
    pub fn on_pointer_move(&self, client_x: f32, client_y: f32) {
        let snapshot: Vec<(RegionId, MotionValue, MotionValue)> = {
            let bindings = self.bindings.lock().unwrap();
            bindings
                .values()
                .map(|b| (b.region, b.x.clone(), b.y.clone()))
                .collect()
        };
        for (region, x, y) in snapshot {
            match self.geometry.bounding_rect(region) {
                Some(rect) if rect.width > 0.0 && rect.height > 0.0 => {
                    x.set((client_x - rect.left) / rect.width - 0.5);
                    y.set((client_y - rect.top) / rect.height - 0.5);
                }
                _ => {
                    // Region not mounted (or zero-sized): neutral signal
                    x.set(0.0);
                    y.set(0.0);
                }
            }
        }
    }

    /// Start tracking a region. The returned tracker owns the binding and
    /// removes it on drop.
    pub fn track(&self, region: RegionId) -> PointerTracker {
        let x = MotionValue::new(0.0);
        let y = MotionValue::new(0.0);
        let id = {
            let mut bindings = self.bindings.lock().unwrap();
            let id = bindings.insert(PointerBinding {
                region,
                x: x.clone(),
                y: y.clone(),
            });
            trace!("pointer binding added, {} total", bindings.len());
            id
        };
        PointerTracker {
            x,
            y,
            id,
            bindings: Arc::downgrade(&self.bindings),
        }
    }

    /// Number of live bindings; the host only needs to deliver pointer
    /// events while this is nonzero
    pub fn binding_count(&self) -> usize {
        self.bindings.lock().unwrap().len()
    }
}

/// Normalized pointer coordinates for one tracked region
pub struct PointerTracker {
    x: MotionValue,
    y: MotionValue,
    id: PointerBindingId,
    bindings: Weak<Mutex<PointerBindings>>,
}

impl PointerTracker {
    /// Horizontal coordinate in `[-0.5, 0.5]`
    pub fn x(&self) -> MotionValue {
        self.x.clone()
    }

    /// Vertical coordinate in `[-0.5, 0.5]`
    pub fn y(&self) -> MotionValue {
        self.y.clone()
    }
}

impl Drop for PointerTracker {
    fn drop(&mut self) {
        if let Some(bindings) = self.bindings.upgrade() {
            if let Ok(mut bindings) = bindings.lock() {
                bindings.remove(self.id);
                trace!("pointer binding removed, {} remain", bindings.len());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GeometryProvider, Rect, RegionId, Viewport};
    use std::collections::HashMap;

    struct FixedGeometry {
        rects: HashMap<u64, Rect>,
    }

    impl GeometryProvider for FixedGeometry {
        fn bounding_rect(&self, region: RegionId) -> Option<Rect> {
            self.rects.get(&region.0).copied()
        }

        fn viewport(&self) -> Viewport {
            Viewport {
                width: 1280.0,
                height: 800.0,
            }
        }
    }

    fn hub_with_region(rect: Rect) -> PointerHub {
        let mut rects = HashMap::new();
        rects.insert(1, rect);
        PointerHub::new(Arc::new(FixedGeometry { rects }))
    }

    #[test]
    fn normalizes_against_the_region_rect() {
        let hub = hub_with_region(Rect {
            left: 100.0,
            top: 50.0,
            width: 200.0,
            height: 200.0,
        });
        let tracker = hub.track(RegionId(1));

        // Region center
        hub.on_pointer_move(200.0, 150.0);
        assert_eq!(tracker.x().get(), 0.0);
        assert_eq!(tracker.y().get(), 0.0);

        // Top-left corner
        hub.on_pointer_move(100.0, 50.0);
        assert_eq!(tracker.x().get(), -0.5);
        assert_eq!(tracker.y().get(), -0.5);

        // Bottom-right corner
        hub.on_pointer_move(300.0, 250.0);
        assert_eq!(tracker.x().get(), 0.5);
        assert_eq!(tracker.y().get(), 0.5);
    }

    #[test]
    fn unmounted_region_reads_neutral_zero() {
        let hub = hub_with_region(Rect {
            left: 0.0,
            top: 0.0,
            width: 100.0,
            height: 100.0,
        });
        let tracker = hub.track(RegionId(99));

        hub.on_pointer_move(500.0, 500.0);
        assert_eq!(tracker.x().get(), 0.0);
        assert_eq!(tracker.y().get(), 0.0);
    }

    #[test]
    fn dropping_a_tracker_removes_its_binding() {
        let hub = hub_with_region(Rect {
            left: 0.0,
            top: 0.0,
            width: 100.0,
            height: 100.0,
        });
        let tracker = hub.track(RegionId(1));
        let second = hub.track(RegionId(1));
        assert_eq!(hub.binding_count(), 2);

        drop(tracker);
        assert_eq!(hub.binding_count(), 1);
        drop(second);
        assert_eq!(hub.binding_count(), 0);
    }

    #[test]
    fn one_event_feeds_every_binding() {
        let mut rects = HashMap::new();
        rects.insert(
            1,
            Rect {
                left: 0.0,
                top: 0.0,
                width: 100.0,
                height: 100.0,
            },
        );
        rects.insert(
            2,
            Rect {
                left: 100.0,
                top: 0.0,
                width: 100.0,
                height: 100.0,
            },
        );
        let hub = PointerHub::new(Arc::new(FixedGeometry { rects }));
        let a = hub.track(RegionId(1));
        let b = hub.track(RegionId(2));

        hub.on_pointer_move(100.0, 50.0);
        assert_eq!(a.x().get(), 0.5);
        assert_eq!(b.x().get(), -0.5);
    }
}
