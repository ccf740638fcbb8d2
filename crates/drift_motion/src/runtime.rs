//! Motion runtime
//!
//! Owns the frame scheduler and the shared input hubs, and exposes the
//! narrow inbound signal API the host drives: pointer events, scroll
//! events, and the per-frame clock tick. Events are applied synchronously
//! on arrival, so by the time the host reports the frame every signal
//! source already holds its latest value and the integrators advance from
//! consistent inputs.

use crate::geometry::SharedGeometry;
use crate::pointer::PointerHub;
use crate::scroll::ScrollHub;
use drift_animation::{FrameScheduler, SchedulerHandle};
use std::sync::OnceLock;
use tracing::debug;

/// The engine's wiring for one host environment
pub struct MotionRuntime {
    scheduler: FrameScheduler,
    pointer: PointerHub,
    scroll: ScrollHub,
}

static RUNTIME: OnceLock<MotionRuntime> = OnceLock::new();

impl MotionRuntime {
    pub fn new(geometry: SharedGeometry) -> Self {
        Self {
            scheduler: FrameScheduler::new(),
            pointer: PointerHub::new(geometry.clone()),
            scroll: ScrollHub::new(geometry),
        }
    }

    /// Install the process-wide runtime. The first call wins; later calls
    /// return the existing instance.
    pub fn init_global(geometry: SharedGeometry) -> &'static MotionRuntime {
        RUNTIME.get_or_init(|| {
            debug!("global motion runtime installed");
            MotionRuntime::new(geometry)
        })
    }

    /// The process-wide runtime, if one has been installed
    pub fn global() -> Option<&'static MotionRuntime> {
        RUNTIME.get()
    }

    /// Pointer-move event in device pixel coordinates
    pub fn on_pointer_move(&self, client_x: f32, client_y: f32) {
        self.pointer.on_pointer_move(client_x, client_y);
    }

    /// Scroll event with the viewport's absolute scroll position
    pub fn on_scroll(&self, scroll_y: f32) {
        self.scroll.on_scroll(scroll_y);
    }

    /// Per-frame clock tick with the elapsed time since the previous frame
    pub fn on_frame(&self, elapsed_ms: f32) {
        self.scheduler.on_frame(elapsed_ms);
    }

    /// Whether any node still needs per-frame advancement; the host can
    /// pause its frame loop while this is false and resume on the
    /// scheduler's wake callback
    pub fn is_active(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn handle(&self) -> SchedulerHandle {
        self.scheduler.handle()
    }

    pub fn pointer(&self) -> &PointerHub {
        &self.pointer
    }

    pub fn scroll(&self) -> &ScrollHub {
        &self.scroll
    }
}
