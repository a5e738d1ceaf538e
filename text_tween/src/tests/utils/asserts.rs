// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Various helper functions to assert truths during testing.

use crate::{GlyphMesh, TextSource, TweenManager};

/// Assert that every entry starts where the previous one ends and the buffers
/// end with the last entry.
pub(crate) fn assert_contiguous<S: TextSource>(manager: &TweenManager<S>, case: &str) {
    let mut expected = 0;
    for (i, entry) in manager.entries().iter().enumerate() {
        assert_eq!(entry.offset(), expected, "{case}: entry {i} offset");
        expected = entry.trail();
    }
    assert_eq!(manager.buffer_len(), expected, "{case}: buffer length");
}

/// Assert that the mesh's rendered output equals its unanimated layout.
pub(crate) fn assert_layout_rendered(mesh: &GlyphMesh, case: &str) {
    let rendered = mesh.rendered();
    assert_eq!(rendered.vertices, mesh.vertices(), "{case}: vertices");
    assert_eq!(rendered.colors, mesh.colors(), "{case}: colors");
    assert_eq!(rendered.uv0, mesh.uv0(), "{case}: uv0");
}
