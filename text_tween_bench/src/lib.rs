// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # TextTween Bench
//!
//! This crate provides benchmarks for the TextTween library.

use std::sync::Arc;

use text_tween::glam::{Vec3, Vec4};
use text_tween::{Aabb, CharModifier, GlyphMesh, TweenConfig, TweenManager};

pub mod benches;

/// Character counts every modifier is measured at.
pub const CHAR_COUNTS: [usize; 5] = [1, 10, 100, 1_000, 10_000];

/// Characters per generated line.
const LINE_LENGTH: usize = 80;

/// A text of `chars` unit quads, wrapped into lines of [`LINE_LENGTH`].
pub fn sample_text(chars: usize) -> GlyphMesh {
    let quads: Vec<_> = (0..chars)
        .map(|i| {
            let x = (i % LINE_LENGTH) as f32;
            let y = -1.5 * (i / LINE_LENGTH) as f32;
            Aabb::new(Vec3::new(x, y, 0.0), Vec3::new(x + 0.8, y + 1.0, 0.0))
        })
        .collect();
    GlyphMesh::from_quads(&quads, Vec4::ONE)
}

/// An enabled manager animating one text of `chars` characters with `modifier`.
pub fn sample_manager(chars: usize, modifier: Arc<dyn CharModifier>) -> TweenManager<GlyphMesh> {
    let config = TweenConfig {
        progress: 0.5,
        overlap: 0.5,
        ..TweenConfig::default()
    };
    let mut manager = TweenManager::new(config).unwrap();
    manager.add(sample_text(chars)).unwrap();
    manager.modifiers_mut().push(modifier);
    manager.init().unwrap();
    manager
}
