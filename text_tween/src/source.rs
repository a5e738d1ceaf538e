// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interface to text-shaping collaborators.

use core::sync::atomic::{AtomicU64, Ordering};

use glam::{Vec2, Vec3, Vec4};

use crate::math::Aabb;

/// Unique identifier for a text source.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct SourceId(u64);

impl SourceId {
    /// Creates a new unique identifier.
    #[expect(
        clippy::new_without_default,
        reason = "every call yields a distinct id, so a `Default` impl would be misleading"
    )]
    pub fn new() -> Self {
        static ID_COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying integer value.
    pub fn to_u64(self) -> u64 {
        self.0
    }
}

/// Which UV channel a write targets.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum UvChannel {
    /// The primary texture coordinates.
    Uv0,
    /// The secondary texture coordinates.
    Uv1,
}

/// A text object that contributes a contiguous run of vertices to the shared buffers.
///
/// The read side exposes the layout produced by text shaping: flat per-vertex
/// arrays of `vertex_count` elements, four vertices per character quad. The
/// write side receives the animated data for the source's range after each
/// apply cycle, followed by a [`commit`](TextSource::commit).
///
/// Implementations must keep the read side independent of what was written,
/// so that rebuilding the buffers never captures animated geometry.
pub trait TextSource {
    /// Identity used for registration and change notifications.
    fn id(&self) -> SourceId;

    /// Whether every per-vertex array is populated.
    ///
    /// Copying a source that is not ready fails softly and defers the copy
    /// until the next rehydration.
    fn is_ready(&self) -> bool;

    /// Number of vertices the source currently lays out.
    fn vertex_count(&self) -> usize;

    /// Number of characters the source currently lays out.
    fn character_count(&self) -> usize;

    /// Vertex positions.
    fn vertices(&self) -> &[Vec3];

    /// Vertex colours, linear RGBA.
    fn colors(&self) -> &[Vec4];

    /// Primary texture coordinates.
    fn uv0(&self) -> &[Vec2];

    /// Secondary texture coordinates.
    fn uv1(&self) -> &[Vec2];

    /// Bounds of character `index`.
    fn character_bounds(&self, index: usize) -> Aabb;

    /// Bounds of the whole text.
    fn text_bounds(&self) -> Aabb;

    /// Receives animated vertex positions for the whole source.
    fn set_vertices(&mut self, vertices: &[Vec3]);

    /// Receives animated vertex colours for the whole source.
    fn set_colors(&mut self, colors: &[Vec4]);

    /// Receives texture coordinates for the whole source.
    fn set_uvs(&mut self, channel: UvChannel, uvs: &[Vec2]);

    /// Finalizes the written data for the next render.
    fn commit(&mut self);
}
