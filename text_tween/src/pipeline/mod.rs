// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered scheduling of character modifiers.
//!
//! An apply cycle moves the [`ModifierPipeline`] through
//! [`Idle`](PipelineState::Idle) → [`Scheduled`](PipelineState::Scheduled) →
//! [`Complete`](PipelineState::Complete). [`schedule`](ModifierPipeline::schedule)
//! turns every enabled modifier into a [`CharJob`], in declared order and
//! without duplicates. [`complete`](ModifierPipeline::complete) runs the chain
//! against a buffer: job `n + 1` starts only after job `n` has finished on
//! every character, while each individual job fans out across characters.

mod job;

use core::fmt;
use std::sync::Arc;

use glam::{Vec3, Vec4};
use hashbrown::HashSet;
use log::trace;
use smallvec::SmallVec;

use crate::buffer::BufferStore;
use crate::char_data::CharData;

/// Default number of characters handed to one worker at a time.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Mutable view of one character quad.
#[derive(Debug)]
pub struct CharMut<'a> {
    /// The quad's vertex positions.
    pub vertices: &'a mut [Vec3],
    /// The quad's vertex colours.
    pub colors: &'a mut [Vec4],
    /// Metadata of the character; always valid.
    pub data: &'a CharData,
}

/// A per-character transform, captured with everything it needs for one cycle.
pub type CharJob = Box<dyn Fn(CharMut<'_>) + Send + Sync>;

/// A configured per-character transform unit.
pub trait CharModifier: fmt::Debug + Send + Sync {
    /// Disabled modifiers are skipped when scheduling.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Captures the modifier's configuration at `progress` into a job.
    fn schedule(&self, progress: f32) -> CharJob;
}

/// Where the pipeline is in its apply cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing scheduled.
    Idle,
    /// Jobs are waiting for [`ModifierPipeline::complete`].
    Scheduled,
    /// The last scheduled chain has finished.
    Complete,
}

/// Schedules modifier chains and runs them with fork-join parallelism.
pub struct ModifierPipeline {
    state: PipelineState,
    jobs: SmallVec<[CharJob; 4]>,
    seen: HashSet<usize>,
    batch_size: usize,
}

impl ModifierPipeline {
    /// Creates an idle pipeline fanning out in batches of `batch_size` characters.
    pub fn new(batch_size: usize) -> Self {
        Self {
            state: PipelineState::Idle,
            jobs: SmallVec::new(),
            seen: HashSet::new(),
            batch_size: batch_size.max(1),
        }
    }

    /// The current state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Whether jobs are waiting to be completed.
    pub fn is_scheduled(&self) -> bool {
        self.state == PipelineState::Scheduled
    }

    /// Minimum number of characters per work item.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Sets the minimum number of characters per work item.
    pub fn set_batch_size(&mut self, batch_size: usize) {
        self.batch_size = batch_size.max(1);
    }

    /// Schedules every enabled modifier at `progress`, in order.
    ///
    /// A modifier that appears several times in `modifiers` is scheduled only
    /// once, at its first position. Any chain that was scheduled but never
    /// completed is discarded. Returns the number of scheduled jobs.
    pub fn schedule(&mut self, progress: f32, modifiers: &[Arc<dyn CharModifier>]) -> usize {
        self.jobs.clear();
        self.seen.clear();
        let mut duplicates = 0;
        for modifier in modifiers {
            if !modifier.is_enabled() {
                continue;
            }
            let key = Arc::as_ptr(modifier).cast::<()>() as usize;
            if !self.seen.insert(key) {
                duplicates += 1;
                continue;
            }
            self.jobs.push(modifier.schedule(progress));
        }
        trace!(
            "scheduled {} modifier jobs at progress {progress} ({duplicates} duplicates skipped)",
            self.jobs.len()
        );
        self.state = PipelineState::Scheduled;
        self.jobs.len()
    }

    /// Runs the scheduled chain against `buffers` and blocks until it is done.
    ///
    /// Does nothing unless the pipeline is [`Scheduled`](PipelineState::Scheduled).
    pub fn complete(&mut self, buffers: &mut BufferStore) {
        if self.state != PipelineState::Scheduled {
            return;
        }
        let (vertices, colors, chars) = buffers.transform_parts();
        for job in self.jobs.drain(..) {
            job::for_each_char(&job, vertices, colors, chars, self.batch_size);
        }
        self.state = PipelineState::Complete;
    }

    /// Drops any scheduled jobs and returns to [`Idle`](PipelineState::Idle).
    pub fn reset(&mut self) {
        self.jobs.clear();
        self.seen.clear();
        self.state = PipelineState::Idle;
    }
}

impl Default for ModifierPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl fmt::Debug for ModifierPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModifierPipeline")
            .field("state", &self.state)
            .field("jobs", &self.jobs.len())
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}
