// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounds-checked range primitives shared by every parallel array.

use core::ops::Range;
use std::collections::TryReserveError;

/// Returns `start..start + length` if it fits within `limit`.
#[inline]
pub(crate) fn checked_range(start: usize, length: usize, limit: usize) -> Option<Range<usize>> {
    let end = start.checked_add(length)?;
    (end <= limit).then_some(start..end)
}

/// Shifts `length` elements from `from` to `to` inside one array.
///
/// Overlapping ranges are handled like `memmove`: a right shift copies from
/// the highest index down, a left shift from the lowest index up, so no
/// source element is overwritten before it has been read. Elements in the
/// vacated part of the source range keep their old values.
///
/// The caller must have checked both ranges against `array.len()`.
#[inline]
pub(crate) fn move_within<T: Copy>(array: &mut [T], from: usize, to: usize, length: usize) {
    if from == to || length == 0 {
        return;
    }
    array.copy_within(from..from + length, to);
}

/// Copies `length` elements from `src[from..]` to `dst[to..]`.
///
/// The caller must have checked both ranges.
#[inline]
pub(crate) fn move_between<T: Copy>(
    src: &[T],
    dst: &mut [T],
    from: usize,
    to: usize,
    length: usize,
) {
    dst[to..to + length].copy_from_slice(&src[from..from + length]);
}

/// Extends `array` to `length` elements, filling with `T::default()`.
///
/// Reserves exactly what is missing first so an allocation failure is
/// reported instead of aborting. Never shrinks.
pub(crate) fn try_grow<T: Clone + Default>(
    array: &mut Vec<T>,
    length: usize,
) -> Result<(), TryReserveError> {
    if array.len() >= length {
        return Ok(());
    }
    array.try_reserve_exact(length - array.len())?;
    array.resize(length, T::default());
    Ok(())
}
