// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fork-join execution of one job over every character quad.

use glam::{Vec3, Vec4};

use super::{CharJob, CharMut};
use crate::buffer::VERTICES_PER_CHAR;
use crate::char_data::CharData;

/// Runs `job` once for every valid character quad and returns when all of
/// them have finished.
///
/// Each quad is handed to exactly one invocation, so invocations never share
/// a vertex. Work is split into batches of at least `batch_size` characters.
/// Quads whose [`CharData`] is not valid are skipped.
pub(crate) fn for_each_char(
    job: &CharJob,
    vertices: &mut [Vec3],
    colors: &mut [Vec4],
    chars: &[CharData],
    batch_size: usize,
) {
    debug_assert!(
        vertices.len() == colors.len() && colors.len() == chars.len(),
        "parallel arrays must have equal length"
    );

    let run = |((vertices, colors), chars): ((&mut [Vec3], &mut [Vec4]), &[CharData])| {
        let data = &chars[0];
        if !data.is_valid() {
            return;
        }
        job(CharMut {
            vertices,
            colors,
            data,
        });
    };

    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;

        vertices
            .par_chunks_mut(VERTICES_PER_CHAR)
            .zip(colors.par_chunks_mut(VERTICES_PER_CHAR))
            .zip(chars.par_chunks(VERTICES_PER_CHAR))
            .with_min_len(batch_size.max(1))
            .for_each(run);
    }

    #[cfg(not(feature = "rayon"))]
    {
        let _ = batch_size;
        vertices
            .chunks_mut(VERTICES_PER_CHAR)
            .zip(colors.chunks_mut(VERTICES_PER_CHAR))
            .zip(chars.chunks(VERTICES_PER_CHAR))
            .for_each(run);
    }
}
