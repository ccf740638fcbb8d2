//! Range transforms
//!
//! Pure derived values: a transform recomputes from its source(s) on every
//! read and holds no mutable state of its own. Mappings come in two shapes,
//! a two-point range and an N-stop piecewise-linear curve; both clip to the
//! codomain when clamping is enabled and extrapolate linearly when it is not.

use crate::value::{Readable, Subscriber, Subscription};
use smallvec::SmallVec;
use std::sync::Arc;
use thiserror::Error;

/// Configuration errors detected when a mapping is constructed.
///
/// A degenerate domain would divide by zero on every read, so construction
/// rejects it instead.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum RangeError {
    #[error("degenerate domain: [{0}, {1}] has zero width")]
    DegenerateDomain(f32, f32),
    #[error("domain stops must be strictly increasing at index {0}")]
    NonIncreasingStops(usize),
    #[error("mapping needs {domain} codomain stops to match its domain, got {codomain}")]
    MismatchedStops { domain: usize, codomain: usize },
    #[error("mapping needs at least two stops, got {0}")]
    TooFewStops(usize),
}

/// A pure input → output mapping usable by [`Transform`]
pub trait Mapping: Send + Sync {
    fn map(&self, input: f32) -> f32;
}

/// Linear interpolation from a domain interval onto a codomain interval
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapRange {
    domain: [f32; 2],
    codomain: [f32; 2],
    clamp: bool,
}

impl MapRange {
    /// Create a clamped mapping. Inputs outside `domain` clip to its
    /// boundary, so the output never leaves `codomain`.
    pub fn new(domain: [f32; 2], codomain: [f32; 2]) -> Result<Self, RangeError> {
        if (domain[1] - domain[0]).abs() <= f32::EPSILON {
            return Err(RangeError::DegenerateDomain(domain[0], domain[1]));
        }
        Ok(Self {
            domain,
            codomain,
            clamp: true,
        })
    }

    /// Allow linear extrapolation past the domain (velocity-reactive
    /// overshoot effects rely on this)
    pub fn unclamped(mut self) -> Self {
        self.clamp = false;
        self
    }
}

impl Mapping for MapRange {
    fn map(&self, input: f32) -> f32 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.codomain;
        let input = if self.clamp {
            input.clamp(d0.min(d1), d0.max(d1))
        } else {
            input
        };
        r0 + (input - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// Piecewise-linear interpolation through matched domain/codomain stops.
///
/// The domain must be strictly increasing. Used where a mapping bends, e.g.
/// a velocity boost that scales up when scrolling backward and down when
/// scrolling forward.
#[derive(Clone, Debug)]
pub struct MapStops {
    domain: SmallVec<[f32; 4]>,
    codomain: SmallVec<[f32; 4]>,
    clamp: bool,
}

impl MapStops {
    pub fn new(domain: &[f32], codomain: &[f32]) -> Result<Self, RangeError> {
        if domain.len() < 2 {
            return Err(RangeError::TooFewStops(domain.len()));
        }
        if domain.len() != codomain.len() {
            return Err(RangeError::MismatchedStops {
                domain: domain.len(),
                codomain: codomain.len(),
            });
        }
        for (i, pair) in domain.windows(2).enumerate() {
            if pair[1] - pair[0] <= f32::EPSILON {
                return Err(RangeError::NonIncreasingStops(i + 1));
            }
        }
        Ok(Self {
            domain: SmallVec::from_slice(domain),
            codomain: SmallVec::from_slice(codomain),
            clamp: true,
        })
    }

    /// Allow linear extrapolation past the end stops
    pub fn unclamped(mut self) -> Self {
        self.clamp = false;
        self
    }

    fn segment(&self, input: f32) -> usize {
        // Index of the segment whose domain interval holds the input; ends
        // extend the first/last segment.
        let last = self.domain.len() - 2;
        for i in 0..=last {
            if input <= self.domain[i + 1] {
                return i;
            }
        }
        last
    }
}

impl Mapping for MapStops {
    fn map(&self, input: f32) -> f32 {
        let first = self.domain[0];
        let last = self.domain[self.domain.len() - 1];
        if self.clamp {
            if input <= first {
                return self.codomain[0];
            }
            if input >= last {
                return self.codomain[self.codomain.len() - 1];
            }
        }
        let i = self.segment(input);
        let (d0, d1) = (self.domain[i], self.domain[i + 1]);
        let (r0, r1) = (self.codomain[i], self.codomain[i + 1]);
        r0 + (input - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// A derived node mapping one source through a [`Mapping`].
///
/// Reads recompute from the source every time; there is no caching, since a
/// range interpolation is cheaper than invalidation bookkeeping would be.
#[derive(Clone)]
pub struct Transform<S, M = MapRange> {
    source: S,
    mapping: M,
}

impl<S: Readable, M: Mapping> Transform<S, M> {
    pub fn new(source: S, mapping: M) -> Self {
        Self { source, mapping }
    }
}

impl<S: Readable, M: Mapping + Clone + 'static> Readable for Transform<S, M> {
    fn get(&self) -> f32 {
        self.mapping.map(self.source.get())
    }

    fn subscribe(&self, subscriber: Subscriber) -> Subscription {
        let mapping = self.mapping.clone();
        self.source
            .subscribe(Box::new(move |input| subscriber(mapping.map(input))))
    }
}

/// A derived node applying an arbitrary function over several sources.
///
/// The function sees the tuple of current source values at the instant of
/// each read or notification.
#[derive(Clone)]
pub struct Computed {
    sources: Arc<[Box<dyn Readable>]>,
    compute: Arc<dyn Fn(&[f32]) -> f32 + Send + Sync>,
}

impl Computed {
    pub fn new(
        sources: Vec<Box<dyn Readable>>,
        compute: impl Fn(&[f32]) -> f32 + Send + Sync + 'static,
    ) -> Self {
        Self {
            sources: sources.into(),
            compute: Arc::new(compute),
        }
    }

    fn eval(&self) -> f32 {
        let current: SmallVec<[f32; 2]> = self.sources.iter().map(|s| s.get()).collect();
        (self.compute)(&current)
    }
}

impl Readable for Computed {
    fn get(&self) -> f32 {
        self.eval()
    }

    fn subscribe(&self, subscriber: Subscriber) -> Subscription {
        let subscriber: Arc<dyn Fn(f32) + Send + Sync> = Arc::from(subscriber);
        let subscriptions: Vec<Subscription> = self
            .sources
            .iter()
            .map(|source| {
                let sources = self.sources.clone();
                let compute = self.compute.clone();
                let subscriber = subscriber.clone();
                source.subscribe(Box::new(move |_| {
                    let current: SmallVec<[f32; 2]> =
                        sources.iter().map(|s| s.get()).collect();
                    subscriber(compute(&current));
                }))
            })
            .collect();
        Subscription::merge(subscriptions)
    }
}
