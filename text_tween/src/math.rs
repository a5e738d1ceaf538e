// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding boxes and float helpers.

use core::fmt;
use core::ops::Sub;

use glam::{Vec2, Vec3};

// From <https://github.com/linebender/tiny-skia/blob/68b198a7210a6bbf752b43d6bc4db62445730313/path/src/scalar.rs#L12>
const SCALAR_NEARLY_ZERO: f32 = 1.0 / (1 << 12) as f32;

/// A number of useful methods for f32 numbers.
pub(crate) trait FloatExt: Sized + Sub<f32, Output = f32> {
    /// Whether the number is approximately 0.
    fn is_nearly_zero(&self) -> bool {
        self.is_nearly_zero_within_tolerance(SCALAR_NEARLY_ZERO)
    }

    /// Whether the number is approximately 0, with a given tolerance.
    fn is_nearly_zero_within_tolerance(&self, tolerance: f32) -> bool;

    /// Clamps the number to `[0, 1]`, mapping NaN to 0.
    fn saturate(self) -> f32;
}

impl FloatExt for f32 {
    #[inline(always)]
    fn is_nearly_zero_within_tolerance(&self, tolerance: f32) -> bool {
        debug_assert!(tolerance >= 0.0, "tolerance must be positive");

        self.abs() <= tolerance
    }

    #[inline(always)]
    fn saturate(self) -> f32 {
        if self.is_nan() {
            0.0
        } else {
            self.clamp(0.0, 1.0)
        }
    }
}

/// An axis-aligned bounding box stored as its minimum and maximum corners.
#[derive(Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct Aabb {
    /// The corner with the smallest coordinates.
    pub min: Vec3,
    /// The corner with the largest coordinates.
    pub max: Vec3,
}

impl Aabb {
    /// The empty box at the origin.
    pub const ZERO: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    /// Creates a box from two corners.
    ///
    /// The corners may be given in any order; each axis is sorted so that
    /// `min <= max` holds afterwards.
    #[inline]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Returns the smallest box containing every point, or [`Aabb::ZERO`] when
    /// `points` is empty.
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Self::ZERO;
        };
        rest.iter().fold(
            Self {
                min: *first,
                max: *first,
            },
            |acc, p| Self {
                min: acc.min.min(*p),
                max: acc.max.max(*p),
            },
        )
    }

    /// Returns the smallest box containing both boxes.
    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Extent of the box along each axis.
    #[inline]
    pub fn size(self) -> Vec3 {
        self.max - self.min
    }

    /// Whether any coordinate is NaN.
    #[inline]
    pub fn is_nan(self) -> bool {
        self.min.is_nan() || self.max.is_nan()
    }

    /// The point at `pivot` within the box's XY extent, where `(0, 0)` is the
    /// minimum corner and `(1, 1)` the maximum. Z is always 0.
    #[inline]
    pub fn pivot_point(self, pivot: Vec2) -> Vec3 {
        let size = self.size();
        Vec3::new(
            self.min.x + pivot.x * size.x,
            self.min.y + pivot.y * size.y,
            0.0,
        )
    }
}

impl fmt::Debug for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Aabb({}, {})", self.min, self.max)
    }
}
