// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packed per-vertex storage shared by every registered source.
//!
//! A [`BufferStore`] holds five parallel arrays (positions, colours, two UV
//! channels and per-character metadata) that always have the same logical
//! length. Capacity only ever grows; removing sources shortens the logical
//! length but keeps the allocation for the next growth.

mod range;

use glam::{Vec2, Vec3, Vec4};
use log::debug;

use crate::char_data::{CharData, CharTiming};
use crate::error::Error;
use crate::source::{TextSource, UvChannel};

pub(crate) use range::checked_range;

/// Number of vertices in one character quad.
pub const VERTICES_PER_CHAR: usize = 4;

/// Outcome of copying a source into the buffers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum CopyStatus {
    /// The source's data now occupies the requested range.
    Copied,
    /// The source's per-vertex arrays are not populated yet; nothing was
    /// written. The copy must be retried by a later rehydration.
    NotReady,
}

/// Parallel arrays of equal logical length, addressed in vertex units.
#[derive(Clone, Debug, Default)]
pub struct BufferStore {
    vertices: Vec<Vec3>,
    colors: Vec<Vec4>,
    uv0: Vec<Vec2>,
    uv1: Vec<Vec2>,
    chars: Vec<CharData>,
}

impl BufferStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The logical length shared by every array.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the store holds no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The number of vertices every array can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.vertices
            .capacity()
            .min(self.colors.capacity())
            .min(self.uv0.capacity())
            .min(self.uv1.capacity())
            .min(self.chars.capacity())
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Vertex colours.
    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    /// Texture coordinates of `channel`.
    pub fn uvs(&self, channel: UvChannel) -> &[Vec2] {
        match channel {
            UvChannel::Uv0 => &self.uv0,
            UvChannel::Uv1 => &self.uv1,
        }
    }

    /// Per-vertex character metadata.
    pub fn chars(&self) -> &[CharData] {
        &self.chars
    }

    /// Mutable positions and colours alongside read-only metadata, for transforms.
    pub(crate) fn transform_parts(&mut self) -> (&mut [Vec3], &mut [Vec4], &[CharData]) {
        (&mut self.vertices, &mut self.colors, &self.chars)
    }

    /// Extends every array to at least `length` units, keeping existing
    /// contents at their offsets. Never shrinks.
    ///
    /// Must not be called while a pipeline is scheduled against this store.
    pub fn ensure_capacity(&mut self, length: usize) -> Result<(), Error> {
        let current = self.len();
        if current >= length {
            return Ok(());
        }
        let failed = |_| Error::allocation_failed(current, length);
        range::try_grow(&mut self.vertices, length).map_err(failed)?;
        range::try_grow(&mut self.colors, length).map_err(failed)?;
        range::try_grow(&mut self.uv0, length).map_err(failed)?;
        range::try_grow(&mut self.uv1, length).map_err(failed)?;
        range::try_grow(&mut self.chars, length).map_err(failed)?;
        debug!("grew tween buffers from {current} to {length} vertices");
        Ok(())
    }

    /// Shortens the logical length to `length`, keeping the allocation.
    pub fn truncate(&mut self, length: usize) {
        self.vertices.truncate(length);
        self.colors.truncate(length);
        self.uv0.truncate(length);
        self.uv1.truncate(length);
        self.chars.truncate(length);
    }

    /// Shifts `length` units from `from` to `to` across every array at once.
    ///
    /// Overlapping ranges are copied in the direction that never overwrites
    /// unread data. Units in the vacated part of the source range keep stale
    /// values until something is copied over them.
    pub fn move_range(&mut self, from: usize, to: usize, length: usize) -> Result<(), Error> {
        let limit = self.len();
        if checked_range(from, length, limit).is_none() {
            return Err(Error::out_of_bounds(from, length, limit));
        }
        if checked_range(to, length, limit).is_none() {
            return Err(Error::out_of_bounds(to, length, limit));
        }
        range::move_within(&mut self.vertices, from, to, length);
        range::move_within(&mut self.colors, from, to, length);
        range::move_within(&mut self.uv0, from, to, length);
        range::move_within(&mut self.uv1, from, to, length);
        range::move_within(&mut self.chars, from, to, length);
        Ok(())
    }

    /// Replaces the whole contents with `other`'s, reusing this store's allocation.
    pub fn copy_from(&mut self, other: &Self) {
        self.vertices.clone_from(&other.vertices);
        self.colors.clone_from(&other.colors);
        self.uv0.clone_from(&other.uv0);
        self.uv1.clone_from(&other.uv1);
        self.chars.clone_from(&other.chars);
    }

    /// Copies `other[offset..offset + length]` into the same range of this store.
    pub fn copy_range_from(
        &mut self,
        other: &Self,
        offset: usize,
        length: usize,
    ) -> Result<(), Error> {
        let limit = self.len().min(other.len());
        if checked_range(offset, length, limit).is_none() {
            return Err(Error::out_of_bounds(offset, length, limit));
        }
        range::move_between(&other.vertices, &mut self.vertices, offset, offset, length);
        range::move_between(&other.colors, &mut self.colors, offset, offset, length);
        range::move_between(&other.uv0, &mut self.uv0, offset, offset, length);
        range::move_between(&other.uv1, &mut self.uv1, offset, offset, length);
        range::move_between(&other.chars, &mut self.chars, offset, offset, length);
        Ok(())
    }

    /// Copies `source`'s per-vertex arrays in at `offset` and rebuilds the
    /// matching [`CharData`] with staggered timing for `overlap`.
    ///
    /// Returns [`CopyStatus::NotReady`] without writing anything when the
    /// source's arrays are not populated. The range must already be within
    /// the logical length.
    pub fn copy_in<S: TextSource + ?Sized>(
        &mut self,
        source: &S,
        offset: usize,
        overlap: f32,
    ) -> Result<CopyStatus, Error> {
        let length = source.vertex_count();
        if length % VERTICES_PER_CHAR != 0 {
            return Err(Error::invalid_vertex_count(offset, length));
        }
        let Some(range) = checked_range(offset, length, self.len()) else {
            return Err(Error::out_of_bounds(offset, length, self.len()));
        };
        if length == 0 {
            return Ok(CopyStatus::Copied);
        }
        let (vertices, colors, uv0, uv1) =
            (source.vertices(), source.colors(), source.uv0(), source.uv1());
        if !source.is_ready()
            || vertices.len() < length
            || colors.len() < length
            || uv0.len() < length
            || uv1.len() < length
        {
            return Ok(CopyStatus::NotReady);
        }

        self.vertices[range.clone()].copy_from_slice(&vertices[..length]);
        self.colors[range.clone()].copy_from_slice(&colors[..length]);
        self.uv0[range.clone()].copy_from_slice(&uv0[..length]);
        self.uv1[range.clone()].copy_from_slice(&uv1[..length]);

        let char_count = source.character_count();
        let count = u32::try_from(char_count).unwrap_or(u32::MAX);
        let timing = CharTiming::new(char_count, overlap);
        let text_bounds = source.text_bounds();
        for (ci, quad) in self.chars[range].chunks_mut(VERTICES_PER_CHAR).enumerate() {
            let data = if ci < char_count {
                CharData::new(
                    u32::try_from(ci).unwrap_or(u32::MAX),
                    count,
                    timing.interval(ci),
                    source.character_bounds(ci),
                    text_bounds,
                )
            } else {
                // More quads than characters; leave them invalid so transforms skip them.
                CharData::default()
            };
            quad.fill(data);
        }
        Ok(CopyStatus::Copied)
    }

    /// Writes `self[offset..offset + length]` to `sink` and commits it.
    pub fn copy_out<S: TextSource + ?Sized>(
        &self,
        sink: &mut S,
        offset: usize,
        length: usize,
    ) -> Result<(), Error> {
        let Some(range) = checked_range(offset, length, self.len()) else {
            return Err(Error::out_of_bounds(offset, length, self.len()));
        };
        sink.set_vertices(&self.vertices[range.clone()]);
        sink.set_colors(&self.colors[range.clone()]);
        sink.set_uvs(UvChannel::Uv0, &self.uv0[range.clone()]);
        sink.set_uvs(UvChannel::Uv1, &self.uv1[range]);
        sink.commit();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Aabb, ErrorKind, GlyphMesh};

    fn text(chars: usize, x: f32) -> GlyphMesh {
        let quads: Vec<_> = (0..chars)
            .map(|i| {
                let left = x + i as f32;
                Aabb::new(Vec3::new(left, 0.0, 0.0), Vec3::new(left + 1.0, 1.0, 0.0))
            })
            .collect();
        GlyphMesh::from_quads(&quads, Vec4::ONE)
    }

    #[test]
    fn capacity_growth_keeps_contents() {
        let mut store = BufferStore::new();
        store.ensure_capacity(8).unwrap();
        assert_eq!(store.copy_in(&text(2, 0.0), 0, 0.0), Ok(CopyStatus::Copied));
        let before = store.vertices().to_vec();

        store.ensure_capacity(32).unwrap();
        assert_eq!(store.len(), 32);
        assert_eq!(&store.vertices()[..8], &before[..], "contents keep their offsets");
        assert_eq!(store.chars().len(), 32, "all arrays grow together");

        store.ensure_capacity(4).unwrap();
        assert_eq!(store.len(), 32, "growth never shrinks");
    }

    #[test]
    fn failed_growth_is_reported_without_truncation() {
        let mut store = BufferStore::new();
        store.ensure_capacity(8).unwrap();
        assert_eq!(store.copy_in(&text(2, 0.0), 0, 0.0), Ok(CopyStatus::Copied));
        let before = store.vertices().to_vec();

        let err = store.ensure_capacity(usize::MAX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AllocationFailed);
        assert_eq!(store.len(), 8, "length unchanged");
        assert_eq!(store.vertices(), &before[..], "contents unchanged");
    }

    #[test]
    fn truncate_keeps_capacity() {
        let mut store = BufferStore::new();
        store.ensure_capacity(16).unwrap();
        store.truncate(4);
        assert_eq!(store.len(), 4);
        assert!(store.capacity() >= 16, "allocation is kept");
    }

    #[test]
    fn copy_in_builds_char_data() {
        let mut store = BufferStore::new();
        store.ensure_capacity(12).unwrap();
        assert_eq!(store.copy_in(&text(3, 0.0), 0, 1.0), Ok(CopyStatus::Copied));
        let chars = store.chars();
        for (i, data) in chars.iter().enumerate() {
            assert_eq!(data.index as usize, i / VERTICES_PER_CHAR, "vertex {i}");
            assert_eq!(data.count, 3);
            assert!(data.is_valid(), "vertex {i} is valid");
        }
        assert_eq!(chars[0].interval.x, 0.0);
        assert!((chars[11].interval.y - 1.0).abs() < 1e-6, "last window ends at one");
        assert_eq!(chars[4].char_bounds.min, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn copy_in_not_ready_writes_nothing() {
        let mut store = BufferStore::new();
        store.ensure_capacity(4).unwrap();
        let mut source = text(1, 5.0);
        source.clear_uvs();
        assert_eq!(store.copy_in(&source, 0, 0.0), Ok(CopyStatus::NotReady));
        assert_eq!(store.vertices(), &[Vec3::ZERO; 4], "no partial writes");
        assert!(!store.chars()[0].is_valid(), "metadata untouched");
    }

    #[test]
    fn copy_in_rejects_partial_quads() {
        let mut store = BufferStore::new();
        store.ensure_capacity(8).unwrap();
        let source = GlyphMesh::new(
            vec![Vec3::ZERO; 6],
            vec![Vec4::ONE; 6],
            vec![Vec2::ZERO; 6],
            vec![Vec2::ZERO; 6],
            vec![Aabb::ZERO; 2],
        );
        let err = store.copy_in(&source, 0, 0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidVertexCount);
    }

    #[test]
    fn copy_in_out_of_bounds() {
        let mut store = BufferStore::new();
        store.ensure_capacity(4).unwrap();
        let err = store.copy_in(&text(2, 0.0), 0, 0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
    }

    #[test]
    fn move_range_round_trip() {
        let mut store = BufferStore::new();
        store.ensure_capacity(24).unwrap();
        assert_eq!(store.copy_in(&text(4, 0.0), 0, 0.5), Ok(CopyStatus::Copied));
        let vertices = store.vertices()[0..16].to_vec();
        let chars = store.chars()[0..16].to_vec();

        store.move_range(0, 8, 16).unwrap();
        assert_eq!(&store.vertices()[8..24], &vertices[..], "shifted right intact");
        store.move_range(8, 0, 16).unwrap();
        assert_eq!(&store.vertices()[0..16], &vertices[..], "round trip restores positions");
        assert_eq!(&store.chars()[0..16], &chars[..], "round trip restores metadata");
    }

    #[test]
    fn move_range_bounds() {
        let mut store = BufferStore::new();
        store.ensure_capacity(8).unwrap();
        assert_eq!(
            store.move_range(4, 0, 8).unwrap_err().kind(),
            ErrorKind::OutOfBounds
        );
        assert_eq!(
            store.move_range(0, 4, 8).unwrap_err().kind(),
            ErrorKind::OutOfBounds
        );
        store.move_range(3, 3, 5).unwrap();

        let err = store.move_range(usize::MAX, 0, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);
        assert!(err.to_string().contains("out of bounds"), "formats without overflowing");
    }

    #[test]
    fn copy_out_commits_the_range() {
        let mut store = BufferStore::new();
        store.ensure_capacity(8).unwrap();
        let first = text(1, 0.0);
        let mut second = text(1, 3.0);
        assert_eq!(store.copy_in(&first, 0, 0.0), Ok(CopyStatus::Copied));
        assert_eq!(store.copy_in(&second, 4, 0.0), Ok(CopyStatus::Copied));

        store.copy_out(&mut second, 4, 4).unwrap();
        assert_eq!(second.rendered().revision, 1);
        assert_eq!(second.rendered().vertices[0], Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(
            store.copy_out(&mut second, 6, 4).unwrap_err().kind(),
            ErrorKind::OutOfBounds
        );
    }
}
