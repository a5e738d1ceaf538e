// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use glam::Vec4;
use peniko::color::LinearSrgb;
use peniko::Color;

use super::Easing;
use crate::curve::Curve;
use crate::pipeline::{CharJob, CharModifier, CharMut};

/// Blends each character's vertex colours toward a target colour.
#[derive(Debug)]
pub struct ColorModifier {
    /// Colour reached at full progress.
    pub target: Color,
    easing: Easing,
}

impl ColorModifier {
    /// Creates a modifier blending toward `target` along a linear curve.
    pub fn new(target: Color) -> Self {
        Self {
            target,
            easing: Easing::default(),
        }
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

    /// Enables or disables the modifier. Disabling releases the baked curve.
    ///
    /// A manager picks up the switch on its next tick.
    pub fn set_enabled(&self, enabled: bool) {
        self.easing.set_enabled(enabled);
    }

    /// The target as a linear RGBA vertex colour.
    pub fn target_linear(&self) -> Vec4 {
        Vec4::from_array(self.target.convert::<LinearSrgb>().components)
    }
}

impl CharModifier for ColorModifier {
    fn is_enabled(&self) -> bool {
        self.easing.is_enabled()
    }

    fn schedule(&self, progress: f32) -> CharJob {
        let curve = self.easing.sampler();
        let target = self.target_linear();
        Box::new(move |glyph: CharMut<'_>| {
            let p = curve.evaluate(glyph.data.local_progress(progress));
            for c in glyph.colors.iter_mut() {
                *c = c.lerp(target, p);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};
    use peniko::color::palette::css;

    use super::*;
    use crate::char_data::CharData;
    use crate::math::Aabb;

    fn run(modifier: &ColorModifier, progress: f32) -> [Vec4; 4] {
        let mut vertices = [Vec3::ZERO; 4];
        let mut colors = [Vec4::new(1.0, 1.0, 1.0, 1.0); 4];
        let bounds = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let data = CharData::new(0, 1, Vec2::new(0.0, 1.0), bounds, bounds);
        modifier.schedule(progress)(CharMut {
            vertices: &mut vertices,
            colors: &mut colors,
            data: &data,
        });
        colors
    }

    #[test]
    fn reaches_the_target_at_full_progress() {
        let modifier = ColorModifier::new(css::BLACK);
        assert_eq!(run(&modifier, 1.0), [Vec4::new(0.0, 0.0, 0.0, 1.0); 4]);
    }

    #[test]
    fn keeps_the_original_at_zero_progress() {
        let modifier = ColorModifier::new(css::BLACK);
        assert_eq!(run(&modifier, 0.0), [Vec4::ONE; 4]);
    }

    #[test]
    fn blends_halfway() {
        let modifier = ColorModifier::new(Color::from_rgba8(0, 0, 0, 0)).with_curve(|_: f32| 0.5);
        let colors = run(&modifier, 0.3);
        assert_eq!(colors[3], Vec4::splat(0.5), "half of the way to transparent black");
    }
}
