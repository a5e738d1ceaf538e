// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-character metadata and staggered timing.

use glam::{Vec2, Vec3};

use crate::math::{Aabb, FloatExt};

/// Metadata for one character, stored once per vertex of its quad.
///
/// Records are immutable; they are rebuilt wholesale whenever the owning
/// source's buffer range is (re)copied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct CharData {
    /// Index of the character within its source.
    pub index: u32,
    /// Number of characters in the source.
    pub count: u32,
    /// Normalized progress window `[start, end]` in which the character animates.
    pub interval: Vec2,
    /// Bounds of the character's quad.
    pub char_bounds: Aabb,
    /// Bounds of the whole source text.
    pub text_bounds: Aabb,
}

impl CharData {
    /// Creates a new record.
    pub fn new(
        index: u32,
        count: u32,
        interval: Vec2,
        char_bounds: Aabb,
        text_bounds: Aabb,
    ) -> Self {
        Self {
            index,
            count,
            interval,
            char_bounds,
            text_bounds,
        }
    }

    /// Whether the record can be fed to a transform.
    ///
    /// Requires a non-empty interval, an index inside the character count,
    /// and bounds free of NaN. Zeroed padding records are never valid.
    pub fn is_valid(&self) -> bool {
        self.interval.x < self.interval.y
            && self.index < self.count
            && !self.char_bounds.is_nan()
            && !self.text_bounds.is_nan()
    }

    /// Maps the global `progress` into this character's window, saturated to `[0, 1]`.
    #[inline]
    pub fn local_progress(&self, progress: f32) -> f32 {
        ((progress - self.interval.x) / (self.interval.y - self.interval.x)).saturate()
    }

    /// The point at the normalized `pivot` inside this character's bounds.
    #[inline]
    pub fn pivot_point(&self, pivot: Vec2) -> Vec3 {
        self.char_bounds.pivot_point(pivot)
    }
}

/// Staggered per-character timing for one source.
///
/// Consecutive windows overlap by `overlap` of a unit duration; the first
/// window starts at 0 and the last ends at 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharTiming {
    step: f32,
    duration: f32,
}

impl CharTiming {
    /// Computes the timing for `char_count` characters.
    pub fn new(char_count: usize, overlap: f32) -> Self {
        if char_count == 0 {
            return Self {
                step: 0.0,
                duration: 1.0,
            };
        }
        let total_time = (char_count - 1) as f32 * overlap + 1.0;
        Self {
            step: overlap / total_time,
            duration: 1.0 / total_time,
        }
    }

    /// Offset between the starts of consecutive windows.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Length of each window.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// The progress window of character `index`.
    #[inline]
    pub fn interval(&self, index: usize) -> Vec2 {
        let start = self.step * index as f32;
        Vec2::new(start, start + self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn unit_bounds() -> Aabb {
        Aabb::new(Vec3::ZERO, Vec3::ONE)
    }

    #[test]
    fn five_characters_half_overlap() {
        let timing = CharTiming::new(5, 0.5);
        let first = timing.interval(0);
        let last = timing.interval(4);
        assert_eq!(first.x, 0.0, "first window starts at zero");
        assert!((first.y - 1.0 / 3.0).abs() < EPSILON, "total time is 3");
        assert!((last.y - 1.0).abs() < EPSILON, "last window ends at one");
        for i in 0..4 {
            let a = timing.interval(i);
            let b = timing.interval(i + 1);
            assert!(
                (a.y - b.x - 0.5 * timing.duration()).abs() < EPSILON,
                "windows {i} and {} overlap by half a duration",
                i + 1
            );
        }
    }

    #[test]
    fn zero_overlap_is_simultaneous() {
        let timing = CharTiming::new(8, 0.0);
        for i in 0..8 {
            assert_eq!(timing.interval(i), Vec2::new(0.0, 1.0));
        }
    }

    #[test]
    fn full_overlap_is_sequential() {
        let timing = CharTiming::new(4, 1.0);
        assert_eq!(timing.interval(0), Vec2::new(0.0, 0.25));
        assert_eq!(timing.interval(3), Vec2::new(0.75, 1.0));
    }

    #[test]
    fn single_character_spans_everything() {
        for overlap in [0.0, 0.3, 1.0] {
            assert_eq!(CharTiming::new(1, overlap).interval(0), Vec2::new(0.0, 1.0));
        }
    }

    #[test]
    fn validity() {
        let valid = CharData::new(0, 1, Vec2::new(0.0, 1.0), unit_bounds(), unit_bounds());
        assert!(valid.is_valid(), "well formed record");
        assert!(!CharData::default().is_valid(), "zeroed padding record");

        let empty_interval = CharData {
            interval: Vec2::new(0.5, 0.5),
            ..valid
        };
        assert!(!empty_interval.is_valid(), "start must be before end");

        let nan_bounds = CharData {
            text_bounds: Aabb {
                min: Vec3::NAN,
                max: Vec3::ONE,
            },
            ..valid
        };
        assert!(!nan_bounds.is_valid(), "NaN bounds");
    }

    #[test]
    fn local_progress_is_saturated() {
        let data = CharData::new(1, 2, Vec2::new(0.25, 0.75), unit_bounds(), unit_bounds());
        assert_eq!(data.local_progress(0.0), 0.0);
        assert_eq!(data.local_progress(0.5), 0.5);
        assert_eq!(data.local_progress(1.0), 1.0);
    }
}
