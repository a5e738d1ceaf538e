// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves and their precomputed samplers.

use core::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::math::FloatExt;

/// Number of samples taken when a curve is baked into a [`SampledCurve`].
pub const CURVE_RESOLUTION: usize = 1024;

/// A scalar function over normalized time.
///
/// Implemented for any `Fn(f32) -> f32 + Send + Sync`, so closures can be used
/// directly as curves.
pub trait Curve: Send + Sync {
    /// Evaluates the curve at `t`, where `t` is in `[0, 1]`.
    fn sample(&self, t: f32) -> f32;
}

impl<F> Curve for F
where
    F: Fn(f32) -> f32 + Send + Sync,
{
    fn sample(&self, t: f32) -> f32 {
        self(t)
    }
}

/// The identity curve.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Linear;

impl Curve for Linear {
    fn sample(&self, t: f32) -> f32 {
        t
    }
}

/// A curve that ignores its input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Constant(pub f32);

impl Curve for Constant {
    fn sample(&self, _: f32) -> f32 {
        self.0
    }
}

/// A curve baked into evenly spaced samples, evaluated by linear interpolation.
///
/// Cheap to share between worker threads and independent of the cost of the
/// curve it was built from.
#[derive(Clone, PartialEq)]
pub struct SampledCurve {
    samples: Box<[f32]>,
}

impl SampledCurve {
    /// Samples `curve` at `resolution` evenly spaced points covering `[0, 1]`.
    ///
    /// A resolution below 2 is raised to 2.
    pub fn new(curve: &dyn Curve, resolution: usize) -> Self {
        let resolution = resolution.max(2);
        let last = (resolution - 1) as f32;
        let samples = (0..resolution)
            .map(|i| curve.sample(i as f32 / last))
            .collect();
        Self { samples }
    }

    /// Number of stored samples.
    pub fn resolution(&self) -> usize {
        self.samples.len()
    }

    /// Evaluates the baked curve at `t`, clamped to `[0, 1]`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "position is clamped to the sample range before truncation"
    )]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.saturate();
        let last = self.samples.len() - 1;
        if t >= 1.0 {
            return self.samples[last];
        }
        let position = t * last as f32;
        let index = (position as usize).min(last - 1);
        let fraction = position - index as f32;
        let (a, b) = (self.samples[index], self.samples[index + 1]);
        a + (b - a) * fraction
    }
}

impl fmt::Debug for SampledCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampledCurve")
            .field("resolution", &self.samples.len())
            .finish_non_exhaustive()
    }
}

/// Lazily built [`SampledCurve`], shared by every job a modifier schedules.
#[derive(Default)]
pub struct CurveCache {
    sampled: Mutex<Option<Arc<SampledCurve>>>,
}

impl CurveCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached sampler, baking `curve` on first use.
    pub fn get_or_build(&self, curve: &dyn Curve) -> Arc<SampledCurve> {
        self.sampled
            .lock()
            .get_or_insert_with(|| Arc::new(SampledCurve::new(curve, CURVE_RESOLUTION)))
            .clone()
    }

    /// Whether a sampler is currently cached.
    pub fn is_built(&self) -> bool {
        self.sampled.lock().is_some()
    }

    /// Drops the cached sampler. Jobs already holding it keep their copy.
    pub fn release(&self) {
        self.sampled.lock().take();
    }
}

impl fmt::Debug for CurveCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurveCache")
            .field("built", &self.is_built())
            .finish()
    }
}
