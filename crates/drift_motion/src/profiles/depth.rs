//! Scroll-linked motion profiles
//!
//! Depth and section choreography driven by a region's progress through
//! the viewport. `ScrollDepth` adds a velocity-reactive boost so fast
//! scrolling visibly stretches the motion; `SectionMotion` is the pure
//! transform variant used where spring smoothing would fight the
//! scrollbar.

use crate::geometry::RegionId;
use crate::runtime::MotionRuntime;
use crate::scroll::{ScrollOffsets, ScrollTracker};
use drift_animation::{SpringConfig, SpringValue, VelocityTracker};
use drift_core::{MapRange, MapStops, MotionValue, Transform};

/// Scroll velocity (px/s) to boost-factor stops
const BOOST_DOMAIN: [f32; 3] = [-900.0, 0.0, 900.0];
const BOOST_CODOMAIN: [f32; 3] = [1.08, 1.0, 0.92];

/// Progress runs `[0, 1]` through the tracked span
const PROGRESS_DOMAIN: [f32; 2] = [0.0, 1.0];

fn progress_range(codomain: [f32; 2]) -> MapRange {
    MapRange::new(PROGRESS_DOMAIN, codomain).expect("progress domain is non-degenerate")
}

fn progress_spring(
    runtime: &MotionRuntime,
    progress: &MotionValue,
    codomain: [f32; 2],
    config: SpringConfig,
) -> SpringValue {
    SpringValue::follow(
        &runtime.handle(),
        &Transform::new(progress.clone(), progress_range(codomain)),
        config,
    )
}

/// Configuration for [`ScrollDepth`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollDepthConfig {
    pub z_from: f32,
    pub z_to: f32,
    pub rotate_from: f32,
    pub rotate_to: f32,
    pub scale_from: f32,
    pub scale_to: f32,
    pub offsets: ScrollOffsets,
}

impl Default for ScrollDepthConfig {
    fn default() -> Self {
        Self {
            z_from: -200.0,
            z_to: 60.0,
            rotate_from: 3.0,
            rotate_to: -1.0,
            scale_from: 0.95,
            scale_to: 1.0,
            offsets: ScrollOffsets::default(),
        }
    }
}

/// Scroll-linked 3D travel: a region rises out of the page as it crosses
/// the viewport, with scroll speed modulating its scale
pub struct ScrollDepth {
    pub progress: MotionValue,
    pub position: MotionValue,
    pub velocity: VelocityTracker,
    pub velocity_boost: Transform<MotionValue, MapStops>,
    pub z: SpringValue,
    pub rotate_x: SpringValue,
    pub scale: SpringValue,
    _tracker: ScrollTracker,
}

impl ScrollDepth {
    pub fn new(runtime: &MotionRuntime, region: RegionId, config: ScrollDepthConfig) -> Self {
        let tracker = runtime.scroll().track(region, config.offsets);
        let progress = tracker.progress();
        let position = tracker.position();

        let velocity = VelocityTracker::new(&runtime.handle(), position.clone());
        let boost = MapStops::new(&BOOST_DOMAIN, &BOOST_CODOMAIN)
            .expect("boost stops are increasing");
        let velocity_boost = Transform::new(velocity.output(), boost);

        Self {
            z: progress_spring(
                runtime,
                &progress,
                [config.z_from, config.z_to],
                SpringConfig::rigid(),
            ),
            rotate_x: progress_spring(
                runtime,
                &progress,
                [config.rotate_from, config.rotate_to],
                SpringConfig::gentle(),
            ),
            scale: progress_spring(
                runtime,
                &progress,
                [config.scale_from, config.scale_to],
                SpringConfig::gentle(),
            ),
            progress,
            position,
            velocity,
            velocity_boost,
            _tracker: tracker,
        }
    }
}

/// Configuration for [`SectionMotion`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionMotionConfig {
    pub min_scale: f32,
    pub y_from: f32,
    pub y_to: f32,
    pub bg_from: f32,
    pub bg_to: f32,
    pub offsets: ScrollOffsets,
}

impl Default for SectionMotionConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.985,
            y_from: 40.0,
            y_to: -30.0,
            bg_from: -30.0,
            bg_to: 30.0,
            offsets: ScrollOffsets::default(),
        }
    }
}

/// Section entrance choreography: scale-up, lift, and counter-moving
/// backdrop, all locked to scroll progress without smoothing
pub struct SectionMotion {
    pub progress: MotionValue,
    pub scale: Transform<MotionValue>,
    pub y: Transform<MotionValue>,
    pub bg_y: Transform<MotionValue>,
    _tracker: ScrollTracker,
}

impl SectionMotion {
    pub fn new(runtime: &MotionRuntime, region: RegionId, config: SectionMotionConfig) -> Self {
        let tracker = runtime.scroll().track(region, config.offsets);
        let progress = tracker.progress();
        Self {
            scale: Transform::new(
                progress.clone(),
                progress_range([config.min_scale, 1.0]),
            ),
            y: Transform::new(progress.clone(), progress_range([config.y_from, config.y_to])),
            bg_y: Transform::new(
                progress.clone(),
                progress_range([config.bg_from, config.bg_to]),
            ),
            progress,
            _tracker: tracker,
        }
    }
}
