// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host-facing manager tying registry, double buffer and pipeline together.

use core::fmt;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, warn};
use smallvec::SmallVec;

use crate::error::Error;
use crate::math::FloatExt;
use crate::pipeline::{CharModifier, ModifierPipeline, PipelineState, DEFAULT_BATCH_SIZE};
use crate::registry::{BufferEntry, Registry};
use crate::snapshot::Snapshot;
use crate::source::{SourceId, TextSource};

/// Host-tunable parameters of a [`TweenManager`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenConfig {
    /// The global animation clock, in `[0, 1]`.
    pub progress: f32,
    /// How much consecutive character windows overlap, in `[0, 1]`.
    pub overlap: f32,
    /// Minimum number of characters per parallel work item.
    pub batch_size: usize,
}

impl Default for TweenConfig {
    fn default() -> Self {
        Self {
            progress: 0.0,
            overlap: 0.0,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl TweenConfig {
    /// Checks that every field is in range.
    ///
    /// Out-of-range and NaN values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), Error> {
        unit_interval("progress", self.progress)?;
        unit_interval("overlap", self.overlap)?;
        if self.batch_size == 0 {
            return Err(Error::invalid_config("batch_size", 0.0));
        }
        Ok(())
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), Error> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid_config(field, value))
    }
}

/// Whether the host has the manager switched on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle {
    /// Buffers are released; change notifications are not accepted.
    #[default]
    Disabled,
    /// Buffers are hydrated and ticks apply the modifiers.
    Enabled,
}

/// Forwards "this source's layout changed" notifications to a manager.
///
/// Handed out by [`TweenManager::init`]. Notifications are picked up on the
/// next [`tick`](TweenManager::tick); after [`teardown`](TweenManager::teardown)
/// they are dropped.
#[derive(Clone, Debug)]
pub struct ChangeNotifier {
    sender: Sender<SourceId>,
}

impl ChangeNotifier {
    /// Queues a change notification for `id`.
    ///
    /// Returns `false` when the manager is no longer listening.
    pub fn notify(&self, id: SourceId) -> bool {
        self.sender.send(id).is_ok()
    }
}

/// Owns a set of text sources and animates them with an ordered modifier chain.
///
/// Sources are packed into one double-buffered set of arrays. Each apply cycle
/// resets the scratch buffers from the untouched originals, runs every enabled
/// modifier in order and writes each source's range back to it, so a given
/// progress always produces the same output.
///
/// Registry mutations ([`add`](Self::add), [`remove`](Self::remove),
/// [`on_source_changed`](Self::on_source_changed), [`hydrate`](Self::hydrate))
/// first complete any scheduled pipeline, since they relocate the very data the
/// pipeline works on.
pub struct TweenManager<S: TextSource> {
    config: TweenConfig,
    lifecycle: Lifecycle,
    registry: Registry<S>,
    snapshot: Snapshot,
    pipeline: ModifierPipeline,
    modifiers: Vec<Arc<dyn CharModifier>>,
    changes: Option<(Sender<SourceId>, Receiver<SourceId>)>,
    /// Progress of the last completed apply cycle.
    applied: Option<f32>,
    /// The registry or modifier list changed since the last apply.
    dirty: bool,
    /// Which modifiers were enabled when the last cycle was scheduled.
    enabled: SmallVec<[bool; 8]>,
}

impl<S: TextSource> TweenManager<S> {
    /// Creates a disabled manager without sources or modifiers.
    pub fn new(config: TweenConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            config,
            lifecycle: Lifecycle::Disabled,
            registry: Registry::new(),
            snapshot: Snapshot::new(),
            pipeline: ModifierPipeline::new(config.batch_size),
            modifiers: Vec::new(),
            changes: None,
            applied: None,
            dirty: false,
            enabled: SmallVec::new(),
        })
    }

    /// The current configuration.
    pub fn config(&self) -> &TweenConfig {
        &self.config
    }

    /// The current progress.
    pub fn progress(&self) -> f32 {
        self.config.progress
    }

    /// The current overlap.
    pub fn overlap(&self) -> f32 {
        self.config.overlap
    }

    /// Whether the manager is enabled.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Rebuilds the buffers, applies the modifiers once and starts accepting
    /// change notifications.
    ///
    /// Calling this on an enabled manager only hands out another notifier.
    pub fn init(&mut self) -> Result<ChangeNotifier, Error> {
        if let Some((sender, _)) = &self.changes {
            return Ok(ChangeNotifier {
                sender: sender.clone(),
            });
        }
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.changes = Some((sender.clone(), receiver));
        self.lifecycle = Lifecycle::Enabled;
        debug!("enabling tween manager with {} sources", self.registry.len());

        self.hydrate()?;
        self.apply()?;
        Ok(ChangeNotifier { sender })
    }

    /// Advances the manager to `progress`.
    ///
    /// Handles queued change notifications, retries a pending rehydration and
    /// re-applies the modifiers when the progress moved, the registry changed
    /// or a modifier was switched on or off. Returns whether an apply cycle
    /// ran. A disabled manager only records the progress.
    ///
    /// Every queued notification is handled even if one of them fails; the
    /// first error is returned and the registry is flagged for rehydration,
    /// so a later tick rebuilds it.
    pub fn tick(&mut self, progress: f32) -> Result<bool, Error> {
        self.set_progress(progress)?;
        if self.lifecycle == Lifecycle::Disabled {
            return Ok(false);
        }

        let pending: SmallVec<[SourceId; 4]> = match &self.changes {
            Some((_, receiver)) => receiver.try_iter().collect(),
            None => SmallVec::new(),
        };
        let mut first_error = None;
        for id in pending {
            if let Err(err) = self.on_source_changed(id) {
                warn!("change notification for source {} failed: {err}", id.to_u64());
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        if let Some(err) = first_error {
            // The failed sources keep stale entries until a full rebuild succeeds.
            self.registry.mark_for_rehydration();
            return Err(err);
        }
        if self.registry.needs_rehydration() {
            self.hydrate()?;
        }

        let moved = self
            .applied
            .is_none_or(|applied| !(applied - self.config.progress).is_nearly_zero());
        let toggled = self
            .modifiers
            .iter()
            .map(|modifier| modifier.is_enabled())
            .ne(self.enabled.iter().copied());
        if !moved && !self.dirty && !toggled {
            return Ok(false);
        }
        self.apply()?;
        Ok(true)
    }

    /// Applies the modifiers at the current progress, unconditionally.
    pub fn force_update(&mut self) -> Result<(), Error> {
        self.apply()
    }

    /// Runs one full apply cycle: schedule, complete and write out.
    pub fn apply(&mut self) -> Result<(), Error> {
        self.schedule();
        self.complete()?;
        Ok(())
    }

    /// Resets the scratch buffers and schedules every enabled modifier at the
    /// current progress. Nothing runs until [`complete`](Self::complete).
    pub fn schedule(&mut self) -> usize {
        self.enabled.clear();
        self.enabled
            .extend(self.modifiers.iter().map(|modifier| modifier.is_enabled()));
        self.snapshot.begin();
        self.pipeline.schedule(self.config.progress, &self.modifiers)
    }

    /// Runs the scheduled modifiers and writes every source's range back.
    ///
    /// Returns whether anything was scheduled.
    pub fn complete(&mut self) -> Result<bool, Error> {
        if !self.pipeline.is_scheduled() {
            return Ok(false);
        }
        self.pipeline.complete(self.snapshot.modified_mut());
        self.snapshot.write_out(self.registry.iter_mut())?;
        self.applied = Some(self.config.progress);
        self.dirty = false;
        Ok(true)
    }

    /// The state of the modifier pipeline.
    pub fn pipeline_state(&self) -> PipelineState {
        self.pipeline.state()
    }

    /// Flushes the animated state to every source, releases the buffers and
    /// stops accepting change notifications.
    ///
    /// Does nothing on a disabled manager. Sources stay registered; the next
    /// [`init`](Self::init) rebuilds their buffers.
    pub fn teardown(&mut self) -> Result<(), Error> {
        if self.lifecycle == Lifecycle::Disabled {
            return Ok(());
        }
        self.complete()?;
        self.snapshot.flush();
        self.snapshot.write_out(self.registry.iter_mut())?;
        self.snapshot.release();
        self.registry.invalidate();
        self.pipeline.reset();
        self.changes = None;
        self.applied = None;
        self.lifecycle = Lifecycle::Disabled;
        debug!("disabled tween manager");
        Ok(())
    }

    /// Registers `source` at the end of the buffers.
    ///
    /// Returns `Ok(false)` if a source with the same id is already registered;
    /// the duplicate is dropped.
    pub fn add(&mut self, source: S) -> Result<bool, Error> {
        self.complete()?;
        let added = self
            .registry
            .add(source, &mut self.snapshot, self.config.overlap)?;
        self.dirty |= added;
        Ok(added)
    }

    /// Unregisters `id` and hands the source back, carrying its last animated state.
    pub fn remove(&mut self, id: SourceId) -> Result<Option<S>, Error> {
        self.complete()?;
        let removed = self.registry.remove(id, &mut self.snapshot)?;
        self.dirty |= removed.is_some();
        Ok(removed)
    }

    /// Picks up a changed vertex count or layout of `id`.
    ///
    /// Returns `Ok(false)` for unknown sources. On a disabled manager the
    /// change is deferred to the next [`init`](Self::init).
    pub fn on_source_changed(&mut self, id: SourceId) -> Result<bool, Error> {
        self.complete()?;
        if !self.registry.contains(id) {
            warn!("change notification for unknown source {}", id.to_u64());
            return Ok(false);
        }
        if self.lifecycle == Lifecycle::Disabled {
            self.registry.mark_for_rehydration();
            return Ok(true);
        }
        self.registry
            .on_source_changed(id, &mut self.snapshot, self.config.overlap)?;
        self.dirty = true;
        Ok(true)
    }

    /// Rebuilds the buffers from every source.
    ///
    /// Returns whether every source was ready.
    pub fn hydrate(&mut self) -> Result<bool, Error> {
        self.complete()?;
        let ready = self.registry.hydrate(&mut self.snapshot, self.config.overlap)?;
        self.dirty = true;
        Ok(ready)
    }

    /// Sets the overlap and rebuilds every character's timing.
    ///
    /// On a disabled manager the rebuild waits for the next [`init`](Self::init).
    pub fn set_overlap(&mut self, overlap: f32) -> Result<(), Error> {
        unit_interval("overlap", overlap)?;
        self.config.overlap = overlap;
        match self.lifecycle {
            Lifecycle::Enabled => {
                self.hydrate()?;
            }
            Lifecycle::Disabled => self.registry.mark_for_rehydration(),
        }
        Ok(())
    }

    /// Sets the progress used by the next apply cycle.
    pub fn set_progress(&mut self, progress: f32) -> Result<(), Error> {
        unit_interval("progress", progress)?;
        self.config.progress = progress;
        Ok(())
    }

    /// Sets the minimum number of characters per parallel work item.
    pub fn set_batch_size(&mut self, batch_size: usize) -> Result<(), Error> {
        if batch_size == 0 {
            return Err(Error::invalid_config("batch_size", 0.0));
        }
        self.config.batch_size = batch_size;
        self.pipeline.set_batch_size(batch_size);
        Ok(())
    }

    /// The modifier chain, in application order.
    pub fn modifiers(&self) -> &[Arc<dyn CharModifier>] {
        &self.modifiers
    }

    /// The modifier chain, for editing. The next tick re-applies.
    pub fn modifiers_mut(&mut self) -> &mut Vec<Arc<dyn CharModifier>> {
        self.dirty = true;
        &mut self.modifiers
    }

    /// Registered sources, in registration order.
    pub fn sources(&self) -> impl Iterator<Item = &S> + '_ {
        self.registry.iter().map(BufferEntry::source)
    }

    /// The source registered as `id`.
    pub fn source(&self, id: SourceId) -> Option<&S> {
        self.registry.get(id).map(BufferEntry::source)
    }

    /// The source registered as `id`, mutably.
    ///
    /// Call [`on_source_changed`](Self::on_source_changed) after changing its layout.
    pub fn source_mut(&mut self, id: SourceId) -> Option<&mut S> {
        self.registry.get_mut(id).map(BufferEntry::source_mut)
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: SourceId) -> bool {
        self.registry.contains(id)
    }

    /// Per-source buffer ranges, in registration order.
    pub fn entries(&self) -> &[BufferEntry<S>] {
        self.registry.entries()
    }

    /// The shared logical buffer length.
    pub fn buffer_len(&self) -> usize {
        self.snapshot.len()
    }

    /// The original and modified buffers.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Whether a source could not be copied in and a rebuild is pending.
    pub fn needs_rehydration(&self) -> bool {
        self.registry.needs_rehydration()
    }
}

impl<S: TextSource> Drop for TweenManager<S> {
    fn drop(&mut self) {
        if let Err(err) = self.teardown() {
            warn!("failed to flush tween manager on drop: {err}");
        }
    }
}

impl<S: TextSource> fmt::Debug for TweenManager<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenManager")
            .field("config", &self.config)
            .field("lifecycle", &self.lifecycle)
            .field("registry", &self.registry)
            .field("pipeline", &self.pipeline)
            .field("modifiers", &self.modifiers.len())
            .finish_non_exhaustive()
    }
}
