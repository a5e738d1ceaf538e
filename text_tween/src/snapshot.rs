// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The original/modified double buffer.

use crate::buffer::{BufferStore, CopyStatus};
use crate::error::Error;
use crate::registry::BufferEntry;
use crate::source::TextSource;

/// Two [`BufferStore`]s with identical layout.
///
/// `original` holds the data copied in from sources and is never touched by
/// transforms. `modified` is the scratch copy an apply cycle writes into and
/// copies back out of. Every layout change (growth, moves, truncation, fresh
/// copies) is applied to both, so a source's modified range can be written
/// back to it at any point, including on removal.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    original: BufferStore,
    modified: BufferStore,
}

impl Snapshot {
    /// Creates an empty double buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared logical length.
    pub fn len(&self) -> usize {
        self.original.len()
    }

    /// Whether both stores are empty.
    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    /// The untouched source data.
    pub fn original(&self) -> &BufferStore {
        &self.original
    }

    /// The result of the last apply cycle.
    pub fn modified(&self) -> &BufferStore {
        &self.modified
    }

    /// Grows both stores to at least `length` units.
    pub fn ensure_capacity(&mut self, length: usize) -> Result<(), Error> {
        self.original.ensure_capacity(length)?;
        self.modified.ensure_capacity(length)
    }

    /// Shortens both stores to `length` units.
    pub fn truncate(&mut self, length: usize) {
        self.original.truncate(length);
        self.modified.truncate(length);
    }

    /// Moves a range in both stores.
    pub fn move_range(&mut self, from: usize, to: usize, length: usize) -> Result<(), Error> {
        self.original.move_range(from, to, length)?;
        self.modified.move_range(from, to, length)
    }

    /// Copies `source` into the original store at `offset` and mirrors the
    /// fresh range into the modified store.
    pub fn copy_in<S: TextSource + ?Sized>(
        &mut self,
        source: &S,
        offset: usize,
        overlap: f32,
    ) -> Result<CopyStatus, Error> {
        let status = self.original.copy_in(source, offset, overlap)?;
        if status == CopyStatus::Copied {
            self.modified
                .copy_range_from(&self.original, offset, source.vertex_count())?;
        }
        Ok(status)
    }

    /// Resets the modified store to the original and returns it for transforms.
    pub fn begin(&mut self) -> &mut BufferStore {
        self.modified.copy_from(&self.original);
        &mut self.modified
    }

    /// Direct access to the modified store, for completing a pipeline that
    /// was scheduled against it.
    pub(crate) fn modified_mut(&mut self) -> &mut BufferStore {
        &mut self.modified
    }

    /// Writes one entry's modified range back to its source.
    ///
    /// Entries that were never successfully copied in are skipped.
    pub fn write_entry<S: TextSource>(&self, entry: &mut BufferEntry<S>) -> Result<(), Error> {
        if !entry.is_ready() {
            return Ok(());
        }
        let (offset, length) = (entry.offset(), entry.len());
        self.modified.copy_out(entry.source_mut(), offset, length)
    }

    /// Writes every ready entry's modified range back to its source.
    pub fn write_out<'a, S: TextSource + 'a>(
        &self,
        entries: impl IntoIterator<Item = &'a mut BufferEntry<S>>,
    ) -> Result<(), Error> {
        for entry in entries {
            self.write_entry(entry)?;
        }
        Ok(())
    }

    /// Makes the modified state the new original, so it survives a rebuild
    /// of the scratch copy.
    pub fn flush(&mut self) {
        self.original.copy_from(&self.modified);
    }

    /// Drops both stores and their allocations.
    pub fn release(&mut self) {
        self.original = BufferStore::new();
        self.modified = BufferStore::new();
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};

    use super::*;
    use crate::{Aabb, GlyphMesh};

    fn text(chars: usize) -> GlyphMesh {
        let quads: Vec<_> = (0..chars)
            .map(|i| Aabb::new(Vec3::new(i as f32, 0.0, 0.0), Vec3::new(i as f32 + 1.0, 1.0, 0.0)))
            .collect();
        GlyphMesh::from_quads(&quads, Vec4::ONE)
    }

    #[test]
    fn layout_changes_are_mirrored() {
        let mut snapshot = Snapshot::new();
        snapshot.ensure_capacity(8).unwrap();
        assert_eq!(snapshot.copy_in(&text(2), 0, 0.0), Ok(CopyStatus::Copied));
        assert_eq!(
            snapshot.original().vertices(),
            snapshot.modified().vertices(),
            "fresh copy mirrored"
        );

        snapshot.ensure_capacity(12).unwrap();
        snapshot.move_range(0, 4, 8).unwrap();
        assert_eq!(snapshot.modified().len(), 12);
        assert_eq!(
            snapshot.original().vertices(),
            snapshot.modified().vertices(),
            "moves mirrored"
        );

        snapshot.truncate(4);
        assert_eq!(snapshot.modified().len(), 4, "truncation mirrored");
    }

    #[test]
    fn begin_discards_previous_cycle() {
        let mut snapshot = Snapshot::new();
        snapshot.ensure_capacity(4).unwrap();
        assert_eq!(snapshot.copy_in(&text(1), 0, 0.0), Ok(CopyStatus::Copied));
        let (vertices, _, _) = snapshot.begin().transform_parts();
        vertices[0] = Vec3::splat(9.0);
        assert_eq!(snapshot.modified().vertices()[0], Vec3::splat(9.0));
        assert_eq!(snapshot.original().vertices()[0], Vec3::ZERO, "original untouched");

        snapshot.begin();
        assert_eq!(snapshot.modified().vertices()[0], Vec3::ZERO, "scratch reset");
    }

    #[test]
    fn flush_promotes_modified_state() {
        let mut snapshot = Snapshot::new();
        snapshot.ensure_capacity(4).unwrap();
        assert_eq!(snapshot.copy_in(&text(1), 0, 0.0), Ok(CopyStatus::Copied));
        let (vertices, _, _) = snapshot.begin().transform_parts();
        vertices[1] = Vec3::splat(2.0);
        snapshot.flush();
        assert_eq!(snapshot.original().vertices()[1], Vec3::splat(2.0));
    }

    #[test]
    fn write_entry_skips_unready_entries() {
        let mut snapshot = Snapshot::new();
        snapshot.ensure_capacity(4).unwrap();
        let mut entry = BufferEntry::new(text(1), 0, 4);
        snapshot.write_entry(&mut entry).unwrap();
        assert_eq!(entry.source().rendered().revision, 0, "never copied in, nothing written");

        assert_eq!(snapshot.copy_in(entry.source(), 0, 0.0), Ok(CopyStatus::Copied));
        entry.set_ready(true);
        snapshot.write_entry(&mut entry).unwrap();
        assert_eq!(entry.source().rendered().revision, 1);
    }
}
