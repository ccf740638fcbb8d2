//! Scroll signal source
//!
//! Maps viewport scroll position to a clamped `[0, 1]` progress per tracked
//! region. The span is bounded by two viewport fractions: progress is 0
//! when the region's top edge crosses the entry line and 1 when its bottom
//! edge crosses the exit line. The raw scroll position is published
//! alongside progress so velocity trackers can derive scroll speed.

use crate::geometry::{Rect, RegionId, SharedGeometry};
use drift_core::MotionValue;
use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex, Weak};
use tracing::trace;

new_key_type! {
    /// Unique identifier for a scroll binding
    pub struct ScrollBindingId;
}

/// Viewport fractions bounding the tracked span.
///
/// The defaults start the span when the region's top edge reaches 90% of
/// the viewport height and end it when its bottom edge reaches 10%.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollOffsets {
    pub entry: f32,
    pub exit: f32,
}

impl Default for ScrollOffsets {
    fn default() -> Self {
        Self {
            entry: 0.9,
            exit: 0.1,
        }
    }
}

struct ScrollBinding {
    region: RegionId,
    offsets: ScrollOffsets,
    progress: MotionValue,
    position: MotionValue,
}

type ScrollBindings = SlotMap<ScrollBindingId, ScrollBinding>;

/// Shared scroll fan-out over all tracked regions
#[derive(Clone)]
pub struct ScrollHub {
    geometry: SharedGeometry,
    bindings: Arc<Mutex<ScrollBindings>>,
}

impl ScrollHub {
    pub fn new(geometry: SharedGeometry) -> Self {
        Self {
            geometry,
            bindings: Arc::new(Mutex::new(SlotMap::with_key())),
        }
    }

    /// The single shared entry point for scroll events. `scroll_y` is the
    /// viewport's absolute scroll position in device pixels.
    pub fn on_scroll(&self, scroll_y: f32) {
        let snapshot: Vec<(RegionId, ScrollOffsets, MotionValue, MotionValue)> = {
            let bindings = self.bindings.lock().unwrap();
            bindings
                .values()
                .map(|b| (b.region, b.offsets, b.progress.clone(), b.position.clone()))
                .collect()
        };
        for (region, offsets, progress, position) in snapshot {
            position.set(scroll_y);
            progress.set(self.progress_for(region, offsets));
        }
    }

    fn progress_for(&self, region: RegionId, offsets: ScrollOffsets) -> f32 {
        match self.geometry.bounding_rect(region) {
            Some(rect) => span_progress(rect, self.geometry.viewport().height, offsets),
            None => 0.0,
        }
    }

    /// Start tracking a region. The returned tracker owns the binding and
    /// removes it on drop.
    pub fn track(&self, region: RegionId, offsets: ScrollOffsets) -> ScrollTracker {
        // Seed progress from the current geometry so a region mounted
        // mid-page starts at its real position instead of 0
        let progress = MotionValue::new(self.progress_for(region, offsets));
        let position = MotionValue::new(0.0);
        let id = {
            let mut bindings = self.bindings.lock().unwrap();
            let id = bindings.insert(ScrollBinding {
                region,
                offsets,
                progress: progress.clone(),
                position: position.clone(),
            });
            trace!("scroll binding added, {} total", bindings.len());
            id
        };
        ScrollTracker {
            progress,
            position,
            id,
            bindings: Arc::downgrade(&self.bindings),
        }
    }

    /// Number of live bindings; the host only needs to deliver scroll
    /// events while this is nonzero
    pub fn binding_count(&self) -> usize {
        self.bindings.lock().unwrap().len()
    }
}

/// Progress of the region through the tracked span, clamped to `[0, 1]`
fn span_progress(rect: Rect, viewport_height: f32, offsets: ScrollOffsets) -> f32 {
    let entry_line = offsets.entry * viewport_height;
    let exit_line = offsets.exit * viewport_height;
    // Top edge travels from the entry line down to where the bottom edge
    // meets the exit line
    let span = entry_line - (exit_line - rect.height);
    if span.abs() <= f32::EPSILON {
        return if rect.top < entry_line { 1.0 } else { 0.0 };
    }
    ((entry_line - rect.top) / span).clamp(0.0, 1.0)
}

/// Scroll progress and raw scroll position for one tracked region
pub struct ScrollTracker {
    progress: MotionValue,
    position: MotionValue,
    id: ScrollBindingId,
    bindings: Weak<Mutex<ScrollBindings>>,
}

impl ScrollTracker {
    /// Progress through the tracked span in `[0, 1]`
    pub fn progress(&self) -> MotionValue {
        self.progress.clone()
    }

    /// Raw scroll position in device pixels
    pub fn position(&self) -> MotionValue {
        self.position.clone()
    }
}

impl Drop for ScrollTracker {
    fn drop(&mut self) {
        if let Some(bindings) = self.bindings.upgrade() {
            if let Ok(mut bindings) = bindings.lock() {
                bindings.remove(self.id);
                trace!("scroll binding removed, {} remain", bindings.len());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GeometryProvider, Viewport};

    #[test]
    fn progress_spans_entry_to_exit() {
        let offsets = ScrollOffsets::default();
        let rect = |top: f32| Rect {
            left: 0.0,
            top,
            width: 400.0,
            height: 200.0,
        };

        // Viewport 1000px: entry line at 900, exit line at 100.
        // Span = 900 - (100 - 200) = 1000.
        assert_eq!(span_progress(rect(900.0), 1000.0, offsets), 0.0);
        assert_eq!(span_progress(rect(400.0), 1000.0, offsets), 0.5);
        assert_eq!(span_progress(rect(-100.0), 1000.0, offsets), 1.0);

        // Clamped outside the span
        assert_eq!(span_progress(rect(1500.0), 1000.0, offsets), 0.0);
        assert_eq!(span_progress(rect(-800.0), 1000.0, offsets), 1.0);
    }

    #[test]
    fn custom_offsets_shift_the_span() {
        let offsets = ScrollOffsets {
            entry: 1.0,
            exit: 0.0,
        };
        let rect = Rect {
            left: 0.0,
            top: 500.0,
            width: 400.0,
            height: 0.0,
        };
        // Zero-height region with a full-viewport span: progress is the
        // fraction of the viewport above the top edge
        assert_eq!(span_progress(rect, 1000.0, offsets), 0.5);
    }

    struct ScrolledPage {
        region_document_top: f32,
        scroll_y: Mutex<f32>,
    }

    impl GeometryProvider for ScrolledPage {
        fn bounding_rect(&self, region: RegionId) -> Option<Rect> {
            (region == RegionId(1)).then(|| Rect {
                left: 0.0,
                top: self.region_document_top - *self.scroll_y.lock().unwrap(),
                width: 400.0,
                height: 200.0,
            })
        }

        fn viewport(&self) -> Viewport {
            Viewport {
                width: 1280.0,
                height: 1000.0,
            }
        }
    }

    #[test]
    fn tracker_publishes_progress_and_raw_position() {
        let page = Arc::new(ScrolledPage {
            region_document_top: 2000.0,
            scroll_y: Mutex::new(0.0),
        });
        let hub = ScrollHub::new(page.clone());
        let tracker = hub.track(RegionId(1), ScrollOffsets::default());
        assert_eq!(tracker.progress().get(), 0.0);

        // Scroll until the region's top edge reaches the entry line (900)
        *page.scroll_y.lock().unwrap() = 1100.0;
        hub.on_scroll(1100.0);
        assert_eq!(tracker.progress().get(), 0.0);
        assert_eq!(tracker.position().get(), 1100.0);

        // Halfway through the span
        *page.scroll_y.lock().unwrap() = 1600.0;
        hub.on_scroll(1600.0);
        assert_eq!(tracker.progress().get(), 0.5);

        // Past the exit line
        *page.scroll_y.lock().unwrap() = 2500.0;
        hub.on_scroll(2500.0);
        assert_eq!(tracker.progress().get(), 1.0);
    }

    #[test]
    fn unmounted_region_reads_zero_progress() {
        let page = Arc::new(ScrolledPage {
            region_document_top: 2000.0,
            scroll_y: Mutex::new(0.0),
        });
        let hub = ScrollHub::new(page);
        let tracker = hub.track(RegionId(7), ScrollOffsets::default());

        hub.on_scroll(1234.0);
        assert_eq!(tracker.progress().get(), 0.0);
        assert_eq!(tracker.position().get(), 1234.0);
    }

    #[test]
    fn dropping_a_tracker_removes_its_binding() {
        let page = Arc::new(ScrolledPage {
            region_document_top: 0.0,
            scroll_y: Mutex::new(0.0),
        });
        let hub = ScrollHub::new(page);
        let tracker = hub.track(RegionId(1), ScrollOffsets::default());
        assert_eq!(hub.binding_count(), 1);
        drop(tracker);
        assert_eq!(hub.binding_count(), 0);
    }
}
