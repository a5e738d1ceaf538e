// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement of sources inside the shared buffers.

use core::fmt;

use log::{debug, warn};

use crate::buffer::{CopyStatus, VERTICES_PER_CHAR};
use crate::error::Error;
use crate::snapshot::Snapshot;
use crate::source::{SourceId, TextSource};

/// The range one source occupies in the shared buffers.
pub struct BufferEntry<S> {
    source: S,
    offset: usize,
    length: usize,
    ready: bool,
}

impl<S> BufferEntry<S> {
    /// Creates an entry that has not been copied in yet.
    pub fn new(source: S, offset: usize, length: usize) -> Self {
        Self {
            source,
            offset,
            length,
            ready: false,
        }
    }

    /// The tracked source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The tracked source, mutably.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Gives up the tracked source.
    pub fn into_source(self) -> S {
        self.source
    }

    /// First buffer unit of the range.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of buffer units in the range.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether the range is empty.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// One past the last buffer unit of the range.
    pub fn trail(&self) -> usize {
        self.offset + self.length
    }

    /// Whether the source's data was copied in successfully.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub(crate) fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }
}

impl<S: TextSource> BufferEntry<S> {
    /// Identity of the tracked source.
    pub fn id(&self) -> SourceId {
        self.source.id()
    }
}

impl<S> fmt::Debug for BufferEntry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferEntry")
            .field("offset", &self.offset)
            .field("length", &self.length)
            .field("ready", &self.ready)
            .finish_non_exhaustive()
    }
}

/// Ordered source entries plus the compaction policy that keeps them packed.
///
/// Entries stay in registration order. Every operation leaves the entries
/// pairwise disjoint; [`hydrate`](Self::hydrate) additionally makes them
/// contiguous in registration order.
pub struct Registry<S> {
    entries: Vec<BufferEntry<S>>,
    needs_rehydration: bool,
}

impl<S> Default for Registry<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            needs_rehydration: false,
        }
    }
}

impl<S: TextSource> Registry<S> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no source is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[BufferEntry<S>] {
        &self.entries
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &BufferEntry<S>> + '_ {
        self.entries.iter()
    }

    /// Entries in registration order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BufferEntry<S>> + '_ {
        self.entries.iter_mut()
    }

    /// Position of `id` in registration order.
    pub fn position(&self, id: SourceId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: SourceId) -> bool {
        self.position(id).is_some()
    }

    /// The entry for `id`.
    pub fn get(&self, id: SourceId) -> Option<&BufferEntry<S>> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// The entry for `id`, mutably.
    pub fn get_mut(&mut self, id: SourceId) -> Option<&mut BufferEntry<S>> {
        self.entries.iter_mut().find(|e| e.id() == id)
    }

    /// The largest trail over all entries, or 0 when empty.
    ///
    /// New sources are appended here, whichever entry that trail belongs to.
    pub fn total_len(&self) -> usize {
        self.entries.iter().map(BufferEntry::trail).max().unwrap_or(0)
    }

    /// Whether each entry starts where the previous one ends, starting at 0.
    pub fn is_contiguous(&self) -> bool {
        let mut expected = 0;
        for entry in &self.entries {
            if entry.offset != expected {
                return false;
            }
            expected = entry.trail();
        }
        true
    }

    /// Whether a source could not be copied in and a full rebuild is pending.
    pub fn needs_rehydration(&self) -> bool {
        self.needs_rehydration
    }

    /// Requests a full rebuild on the next [`hydrate`](Self::hydrate).
    pub fn mark_for_rehydration(&mut self) {
        self.needs_rehydration = true;
    }

    /// Appends `source` after the entry with the largest trail and copies its
    /// data in.
    ///
    /// Returns `Ok(false)` without touching anything when a source with the
    /// same id is already registered; the duplicate is dropped. A source that
    /// is not ready is still registered, and the registry is flagged for
    /// rehydration.
    pub fn add(
        &mut self,
        source: S,
        snapshot: &mut Snapshot,
        overlap: f32,
    ) -> Result<bool, Error> {
        let id = source.id();
        if self.contains(id) {
            debug!("source {} already registered", id.to_u64());
            return Ok(false);
        }
        let offset = self.total_len();
        let length = whole_quads(&source, offset)?;
        snapshot.ensure_capacity(offset + length)?;

        let mut entry = BufferEntry::new(source, offset, length);
        self.copy_entry(&mut entry, snapshot, overlap)?;
        debug!(
            "registered source {} at {offset}..{}",
            id.to_u64(),
            offset + length
        );
        self.entries.push(entry);
        Ok(true)
    }

    /// Unregisters `id` and closes the gap it leaves behind.
    ///
    /// The entry's modified range is written back to the source first, so the
    /// source keeps its animated state. Returns the source, or `None` when
    /// `id` was not registered.
    pub fn remove(&mut self, id: SourceId, snapshot: &mut Snapshot) -> Result<Option<S>, Error> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        snapshot.write_entry(&mut self.entries[index])?;
        let entry = self.entries.remove(index);

        let (offset, length, trail) = (entry.offset, entry.length, entry.trail());
        let total = snapshot.len();
        for other in &mut self.entries {
            if other.offset >= trail {
                other.offset -= length;
            }
        }
        // Released buffers hold nothing to compact.
        if length > 0 && trail <= total {
            snapshot.move_range(trail, offset, total - trail)?;
            snapshot.truncate(total - length);
        }
        debug!(
            "removed source {} from {offset}..{trail}, {} units remain",
            id.to_u64(),
            snapshot.len()
        );
        Ok(Some(entry.into_source()))
    }

    /// Resizes the entry for `id` to the source's current vertex count and
    /// copies its data in again.
    ///
    /// Entries after it are shifted by the size difference. Returns
    /// `Ok(false)` when `id` is not registered. A vertex count that is not a
    /// whole number of quads is rejected before anything moves.
    pub fn on_source_changed(
        &mut self,
        id: SourceId,
        snapshot: &mut Snapshot,
        overlap: f32,
    ) -> Result<bool, Error> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        let (offset, old_length, old_trail) = {
            let entry = &self.entries[index];
            (entry.offset, entry.length, entry.trail())
        };
        let new_length = whole_quads(&self.entries[index].source, offset)?;

        if new_length != old_length {
            let total = snapshot.len();
            let tail = total.saturating_sub(old_trail);
            let new_trail = offset + new_length;
            if new_length > old_length {
                let delta = new_length - old_length;
                snapshot.ensure_capacity(total + delta)?;
                snapshot.move_range(old_trail, new_trail, tail)?;
            } else {
                let delta = old_length - new_length;
                snapshot.move_range(old_trail, new_trail, tail)?;
                snapshot.truncate(total - delta);
            }
            for (i, other) in self.entries.iter_mut().enumerate() {
                // Empty entries can share an offset; registration order breaks the tie.
                let after = other.offset > offset || (other.offset == offset && i > index);
                if i != index && after {
                    other.offset = other.offset + new_length - old_length;
                }
            }
            debug!(
                "resized source {} from {old_length} to {new_length} units",
                id.to_u64()
            );
        }

        let entry = &mut self.entries[index];
        entry.length = new_length;
        let status = snapshot.copy_in(&entry.source, offset, overlap)?;
        entry.ready = status == CopyStatus::Copied;
        if !entry.ready {
            warn!(
                "source {} not ready after change, deferring to rehydration",
                id.to_u64()
            );
            self.needs_rehydration = true;
        }
        Ok(true)
    }

    /// Rebuilds the buffers from scratch.
    ///
    /// Recomputes contiguous offsets in registration order from every
    /// source's current vertex count and copies every source in again. The
    /// rehydration flag is cleared only when every copy succeeds; the return
    /// value says whether it was.
    pub fn hydrate(&mut self, snapshot: &mut Snapshot, overlap: f32) -> Result<bool, Error> {
        self.needs_rehydration = true;

        let mut total = 0;
        for entry in &self.entries {
            total += whole_quads(&entry.source, total)?;
        }
        snapshot.ensure_capacity(total)?;
        snapshot.truncate(total);

        let mut offset = 0;
        let mut all_ready = true;
        for entry in &mut self.entries {
            entry.offset = offset;
            entry.length = entry.source.vertex_count();
            let status = snapshot.copy_in(&entry.source, offset, overlap)?;
            entry.ready = status == CopyStatus::Copied;
            all_ready &= entry.ready;
            offset += entry.length;
        }

        self.needs_rehydration = !all_ready;
        if all_ready {
            debug!("hydrated {} sources into {total} units", self.entries.len());
        } else {
            warn!("hydrated {total} units, some sources are not ready yet");
        }
        Ok(all_ready)
    }

    /// Marks every entry as not copied in, after the buffers were released.
    pub(crate) fn invalidate(&mut self) {
        for entry in &mut self.entries {
            entry.set_ready(false);
        }
        self.needs_rehydration = true;
    }

    fn copy_entry(
        &mut self,
        entry: &mut BufferEntry<S>,
        snapshot: &mut Snapshot,
        overlap: f32,
    ) -> Result<(), Error> {
        let status = snapshot.copy_in(&entry.source, entry.offset, overlap)?;
        entry.ready = status == CopyStatus::Copied;
        if !entry.ready {
            warn!(
                "source {} not ready, deferring to rehydration",
                entry.id().to_u64()
            );
            self.needs_rehydration = true;
        }
        Ok(())
    }
}

impl<S> fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.entries)
            .field("needs_rehydration", &self.needs_rehydration)
            .finish()
    }
}

/// The source's vertex count, if it is a whole number of quads.
fn whole_quads<S: TextSource + ?Sized>(source: &S, offset: usize) -> Result<usize, Error> {
    let count = source.vertex_count();
    if count % VERTICES_PER_CHAR != 0 {
        return Err(Error::invalid_vertex_count(offset, count));
    }
    Ok(count)
}
