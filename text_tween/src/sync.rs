// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Helpers for hosts that edit source and modifier lists as a whole.
//!
//! An editor typically keeps its own ordered list of sources and modifiers
//! and only wants to tell the manager what changed. [`SourceListSync`]
//! remembers the last list it synchronized and turns a new list into
//! [`remove`](TweenManager::remove) and [`add`](TweenManager::add) calls
//! followed by one apply cycle.

use core::hash::Hash;

use hashbrown::HashSet;
use log::debug;

use crate::error::Error;
use crate::manager::TweenManager;
use crate::source::{SourceId, TextSource};

/// Drops every element whose key was already seen, keeping first occurrences
/// in their original order.
///
/// Returns the number of removed elements.
pub fn remove_duplicates<T, K, F>(list: &mut Vec<T>, mut key: F) -> usize
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let before = list.len();
    let mut seen = HashSet::with_capacity(before);
    list.retain(|element| seen.insert(key(element)));
    before - list.len()
}

/// Whether two ordered identity lists differ in content or order.
pub fn has_changed<K: PartialEq>(previous: &[K], current: &[K]) -> bool {
    previous != current
}

/// What a [`SourceListSync::sync`] call did.
#[derive(Debug)]
pub struct SyncOutcome<S> {
    /// Sources that were unregistered, in the order they were listed before.
    pub removed: Vec<S>,
    /// Number of newly registered sources.
    pub added: usize,
    /// Listed ids for which no source could be provided.
    pub missing: Vec<SourceId>,
}

impl<S> SyncOutcome<S> {
    fn unchanged() -> Self {
        Self {
            removed: Vec::new(),
            added: 0,
            missing: Vec::new(),
        }
    }

    /// Whether the manager was left untouched.
    pub fn is_unchanged(&self) -> bool {
        self.removed.is_empty() && self.added == 0
    }
}

/// Diffs successive source lists against a manager.
#[derive(Clone, Debug, Default)]
pub struct SourceListSync {
    previous: Vec<SourceId>,
}

impl SourceListSync {
    /// Creates a synchronizer that has not seen any list yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a synchronizer primed with the manager's current registry.
    pub fn from_manager<S: TextSource>(manager: &TweenManager<S>) -> Self {
        Self {
            previous: manager.sources().map(TextSource::id).collect(),
        }
    }

    /// The list seen by the last [`sync`](Self::sync).
    pub fn previous(&self) -> &[SourceId] {
        &self.previous
    }

    /// Brings `manager` in line with `current`.
    ///
    /// Ids listed before but not anymore are removed first, then ids that are
    /// new are added, pulling their source from `provide`, and finally the
    /// modifiers are applied once. Duplicate ids in `current` count once.
    /// Nothing happens when `current` equals the previous list.
    pub fn sync<S, F>(
        &mut self,
        manager: &mut TweenManager<S>,
        current: &[SourceId],
        mut provide: F,
    ) -> Result<SyncOutcome<S>, Error>
    where
        S: TextSource,
        F: FnMut(SourceId) -> Option<S>,
    {
        if !has_changed(&self.previous, current) {
            return Ok(SyncOutcome::unchanged());
        }
        let mut current = current.to_vec();
        remove_duplicates(&mut current, |id| *id);
        let keep: HashSet<SourceId> = current.iter().copied().collect();
        let known: HashSet<SourceId> = self.previous.iter().copied().collect();

        let mut outcome = SyncOutcome::unchanged();
        for id in self.previous.iter().filter(|id| !keep.contains(*id)) {
            if let Some(source) = manager.remove(*id)? {
                outcome.removed.push(source);
            }
        }
        for id in current.iter().filter(|id| !known.contains(*id)) {
            if manager.contains(*id) {
                continue;
            }
            match provide(*id) {
                Some(source) => {
                    if manager.add(source)? {
                        outcome.added += 1;
                    }
                }
                None => outcome.missing.push(*id),
            }
        }
        manager.apply()?;
        debug!(
            "synchronized source list: {} removed, {} added",
            outcome.removed.len(),
            outcome.added
        );
        // Missing ids stay out so the next sync retries them.
        current.retain(|id| !outcome.missing.contains(id));
        self.previous = current;
        Ok(outcome)
    }
}
