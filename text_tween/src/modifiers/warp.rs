// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::f32::consts::PI;
use core::fmt;
use std::sync::Arc;

use super::Easing;
use crate::curve::{Curve, CurveCache};
use crate::math::FloatExt;
use crate::pipeline::{CharJob, CharModifier, CharMut};

/// Bends text vertically along a shape spanning the whole source.
///
/// Each vertex moves up by `intensity * shape(x) * p`, where `x` is the
/// vertex's horizontal position normalized to the text bounds and `p` the
/// eased progress of its character.
pub struct WarpModifier {
    /// Vertical offset at the peak of the shape, at full progress.
    pub intensity: f32,
    shape: Arc<dyn Curve>,
    shape_cache: CurveCache,
    easing: Easing,
}

impl WarpModifier {
    /// Creates a modifier with a half-sine arch and a linear curve.
    pub fn new(intensity: f32) -> Self {
        Self {
            intensity,
            shape: Arc::new(|t: f32| (PI * t).sin()),
            shape_cache: CurveCache::new(),
            easing: Easing::default(),
        }
    }

    /// Sets the shape across the text.
    #[must_use]
    pub fn with_shape(mut self, shape: impl Curve + 'static) -> Self {
        self.shape = Arc::new(shape);
        self.shape_cache.release();
        self
    }

    /// Sets the easing curve.
    #[must_use]
    pub fn with_curve(mut self, curve: impl Curve + 'static) -> Self {
        self.set_curve(curve);
        self
    }

    /// Replaces the easing curve and drops the baked sampler.
    pub fn set_curve(&mut self, curve: impl Curve + 'static) {
        self.easing.set_curve(Arc::new(curve));
    }

    /// Enables or disables the modifier. Disabling releases the baked curves.
    ///
    /// A manager picks up the switch on its next tick.
    pub fn set_enabled(&self, enabled: bool) {
        self.easing.set_enabled(enabled);
        if !enabled {
            self.shape_cache.release();
        }
    }
}

impl CharModifier for WarpModifier {
    fn is_enabled(&self) -> bool {
        self.easing.is_enabled()
    }

    fn schedule(&self, progress: f32) -> CharJob {
        let curve = self.easing.sampler();
        let shape = self.shape_cache.get_or_build(self.shape.as_ref());
        let intensity = self.intensity;
        Box::new(move |glyph: CharMut<'_>| {
            let p = curve.evaluate(glyph.data.local_progress(progress));
            if p.is_nearly_zero() {
                return;
            }
            let bounds = glyph.data.text_bounds;
            let width = bounds.size().x;
            for v in glyph.vertices.iter_mut() {
                let x = if width.is_nearly_zero() {
                    0.5
                } else {
                    (v.x - bounds.min.x) / width
                };
                v.y += intensity * shape.evaluate(x) * p;
            }
        })
    }
}

impl fmt::Debug for WarpModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WarpModifier")
            .field("intensity", &self.intensity)
            .field("easing", &self.easing)
            .finish_non_exhaustive()
    }
}
