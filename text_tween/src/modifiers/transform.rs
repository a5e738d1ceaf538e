// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use super::{Easing, ModifierType, ScaleAxes};
use crate::curve::Curve;
use crate::math::Aabb;
use crate::pipeline::{CharJob, CharModifier, CharMut};

/// Moves, rotates or scales each character around a pivot inside its quad.
#[derive(Debug, Default)]
pub struct TransformModifier {
    /// The geometric operation.
    pub kind: ModifierType,
    /// Axes affected by [`ModifierType::Scale`].
    pub scale_axes: ScaleAxes,
    /// Offset, Euler degrees or scale factors at full progress.
    pub intensity: Vec3,
    /// Normalized point within the character's quad the transform is centered on.
    pub pivot: Vec2,
    easing: Easing,
}

impl TransformModifier {
    /// Creates a modifier of `kind` with a linear curve and a bottom-left pivot.
    pub fn new(kind: ModifierType, intensity: Vec3) -> Self {
        Self {
            kind,
            intensity,
            ..Self::default()
        }
    }

    /// Translates characters by `offset` at full progress.
    pub fn position(offset: Vec3) -> Self {
        Self::new(ModifierType::Position, offset)
    }

    /// Rotates characters by `degrees` (Euler, per axis) at full progress.
    pub fn rotation(degrees: Vec3) -> Self {
        Self::new(ModifierType::Rotation, degrees)
    }

    /// Scales the `axes` of each character to `factors` at full progress.
    pub fn scale(factors: Vec3, axes: ScaleAxes) -> Self {
        Self {
            scale_axes: axes,
            ..Self::new(ModifierType::Scale, factors)
        }
    }

    /// Sets the pivot.
    #[must_use]
    pub fn with_pivot(mut self, pivot: Vec2) -> Self {
        self.pivot = pivot;
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

    /// Enables or disables the modifier. Disabling releases the baked curve.
    ///
    /// A manager picks up the switch on its next tick.
    pub fn set_enabled(&self, enabled: bool) {
        self.easing.set_enabled(enabled);
    }

    /// Whether a baked curve is currently held.
    pub fn has_sampler(&self) -> bool {
        self.easing.is_cached()
    }

    /// The transform for eased progress `p`.
    fn matrix(kind: ModifierType, axes: ScaleAxes, intensity: Vec3, p: f32) -> Mat4 {
        match kind {
            ModifierType::Position => Mat4::from_translation(intensity * p),
            ModifierType::Rotation => {
                let r = (intensity * p).map(f32::to_radians);
                Mat4::from_quat(Quat::from_euler(EulerRot::YXZ, r.y, r.x, r.z))
            }
            ModifierType::Scale => {
                let mut s = Vec3::ONE;
                if axes.contains(ScaleAxes::X) {
                    s.x = intensity.x * p;
                }
                if axes.contains(ScaleAxes::Y) {
                    s.y = intensity.y * p;
                }
                if axes.contains(ScaleAxes::Z) {
                    s.z = intensity.z * p;
                }
                Mat4::from_scale(s)
            }
        }
    }
}

impl CharModifier for TransformModifier {
    fn is_enabled(&self) -> bool {
        self.easing.is_enabled()
    }

    fn schedule(&self, progress: f32) -> CharJob {
        let curve = self.easing.sampler();
        let (kind, axes, intensity, pivot) =
            (self.kind, self.scale_axes, self.intensity, self.pivot);
        Box::new(move |glyph: CharMut<'_>| {
            let p = curve.evaluate(glyph.data.local_progress(progress));
            let m = Self::matrix(kind, axes, intensity, p);
            // Pivot on the quad as it stands, so earlier modifiers carry it along.
            let pivot = Aabb::from_points(glyph.vertices).pivot_point(pivot);
            for v in glyph.vertices.iter_mut() {
                *v = m.transform_point3(*v - pivot) + pivot;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;
    use crate::char_data::CharData;
    use crate::curve::Constant;

    fn quad() -> [Vec3; 4] {
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ]
    }

    fn data(interval: Vec2) -> CharData {
        let bounds = Aabb::new(Vec3::ZERO, Vec3::new(2.0, 2.0, 0.0));
        CharData::new(0, 1, interval, bounds, bounds)
    }

    fn run(modifier: &TransformModifier, progress: f32, interval: Vec2) -> [Vec3; 4] {
        let mut vertices = quad();
        let mut colors = [Vec4::ONE; 4];
        let data = data(interval);
        let job = modifier.schedule(progress);
        job(CharMut {
            vertices: &mut vertices,
            colors: &mut colors,
            data: &data,
        });
        vertices
    }

    fn assert_near(actual: [Vec3; 4], expected: [Vec3; 4]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!(a.abs_diff_eq(e, 1e-5), "expected {e}, got {a}");
        }
    }

    #[test]
    fn position_at_full_progress() {
        let modifier = TransformModifier::position(Vec3::new(0.0, 10.0, 0.0));
        let moved = run(&modifier, 1.0, Vec2::new(0.0, 1.0));
        assert_eq!(moved, quad().map(|v| v + Vec3::new(0.0, 10.0, 0.0)));
    }

    #[test]
    fn progress_before_window_is_identity() {
        let modifier = TransformModifier::position(Vec3::splat(3.0));
        assert_eq!(run(&modifier, 0.2, Vec2::new(0.5, 1.0)), quad());
    }

    #[test]
    fn rotation_around_center() {
        let modifier =
            TransformModifier::rotation(Vec3::new(0.0, 0.0, 90.0)).with_pivot(Vec2::splat(0.5));
        let rotated = run(&modifier, 1.0, Vec2::new(0.0, 1.0));
        // A quarter turn counter-clockwise about (1, 1) cycles the corners.
        assert_near(
            rotated,
            [
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 2.0, 0.0),
                Vec3::new(2.0, 2.0, 0.0),
            ],
        );
    }

    #[test]
    fn scale_respects_the_axis_mask() {
        let modifier = TransformModifier::scale(Vec3::splat(0.5), ScaleAxes::X);
        let scaled = run(&modifier, 1.0, Vec2::new(0.0, 1.0));
        assert_eq!(scaled[2], Vec3::new(1.0, 2.0, 0.0), "only x halves");
    }

    #[test]
    fn curve_shapes_the_progress() {
        let modifier =
            TransformModifier::position(Vec3::new(4.0, 0.0, 0.0)).with_curve(Constant(0.5));
        let moved = run(&modifier, 0.0, Vec2::new(0.0, 1.0));
        assert_eq!(moved[0], Vec3::new(2.0, 0.0, 0.0));
        assert!(modifier.has_sampler(), "sampler baked on schedule");
        modifier.set_enabled(false);
        assert!(!modifier.is_enabled());
        assert!(!modifier.has_sampler(), "disabling releases the sampler");
    }
}
