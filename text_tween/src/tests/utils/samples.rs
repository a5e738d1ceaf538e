// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generated texts and managers.

use glam::{Vec3, Vec4};

use crate::{Aabb, GlyphMesh, SourceId, TextSource, TweenConfig, TweenManager};

/// `chars` unit quads laid out left to right from `x`.
pub(crate) fn quads(chars: usize, x: f32) -> Vec<Aabb> {
    (0..chars)
        .map(|i| {
            let left = x + i as f32;
            Aabb::new(Vec3::new(left, 0.0, 0.0), Vec3::new(left + 1.0, 1.0, 0.0))
        })
        .collect()
}

/// A white text of `chars` characters starting at `x`.
pub(crate) fn text(chars: usize, x: f32) -> GlyphMesh {
    GlyphMesh::from_quads(&quads(chars, x), Vec4::ONE)
}

/// A manager with the default configuration.
pub(crate) fn manager<S: TextSource>() -> TweenManager<S> {
    TweenManager::new(TweenConfig::default()).unwrap()
}

/// The `(offset, length)` of `id`'s entry.
pub(crate) fn span<S: TextSource>(manager: &TweenManager<S>, id: SourceId) -> (usize, usize) {
    let entry = manager
        .entries()
        .iter()
        .find(|e| e.id() == id)
        .expect("source is registered");
    (entry.offset(), entry.len())
}
