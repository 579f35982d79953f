// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2025 Shahzad A. Bhatti <bhatti@plexobject.com>
//
// This file is part of PlexSpaces.
//
// PlexSpaces is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 2.1 of the License, or
// (at your option) any later version.
//
// PlexSpaces is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with PlexSpaces. If not, see <https://www.gnu.org/licenses/>.

//! Merged view: the convergent materialization of all observed logs
//!
//! ## Purpose
//! Replays local and merged-remote [`OpLogEntry`] values into per-key handle
//! sets, incrementally (never from scratch on a change).
//!
//! ## Resolution order
//! Per `(key, handle)` pair the view keeps each origin's latest operation
//! (higher sequence number wins within one origin). The pair is present iff
//! some origin's latest operation is a register and no origin's latest
//! operation is a remove. That single rule yields remove-wins across
//! origins as well as re-registration after a remove from the same origin.
//! Terminated handles are excluded from every key outright.

use crate::{OpKind, OpLogEntry, VersionVector};
use plexspaces_reception_core::{ActorHandle, NodeId, ServiceKey};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::warn;

/// Outcome of applying one entry to the view
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    /// The entry changed the handle set of its key
    Changed {
        /// The key whose handle set changed
        key: ServiceKey,
    },
    /// The entry was applied (advancing the origin's stream) without
    /// changing any handle set, e.g. an idempotent re-register
    Unchanged,
    /// Already-seen sequence number; dropped without side effects
    Duplicate,
    /// Sequence gap for the origin; dropped with a diagnostic, healed by
    /// the next full gossip exchange
    Gap {
        /// The sequence number the origin's stream expected next
        expected: u64,
    },
}

/// Latest operation per origin for one `(key, handle)` pair
#[derive(Clone, Debug, Default)]
struct PairState {
    latest: BTreeMap<NodeId, (u64, OpKind)>,
}

impl PairState {
    fn record(&mut self, origin: &NodeId, seq_nr: u64, kind: OpKind) {
        match self.latest.get(origin) {
            Some((seen, _)) if *seen >= seq_nr => {}
            _ => {
                self.latest.insert(origin.clone(), (seq_nr, kind));
            }
        }
    }

    fn resolves_present(&self) -> bool {
        let mut registered = false;
        for (_, kind) in self.latest.values() {
            match kind {
                OpKind::Remove => return false,
                OpKind::Register => registered = true,
            }
        }
        registered
    }
}

/// Per-key materialized handle sets derived from every observed entry
#[derive(Debug, Default)]
pub struct MergedView {
    /// Highest contiguously applied sequence number per origin
    observed: VersionVector,
    /// Resolution state per (key, handle)
    pairs: HashMap<ServiceKey, HashMap<ActorHandle, PairState>>,
    /// Materialized handle sets, kept in sync with `pairs`
    keys: HashMap<ServiceKey, BTreeSet<ActorHandle>>,
    /// Keys each handle is currently present under (reverse index)
    by_handle: HashMap<ActorHandle, HashSet<ServiceKey>>,
    /// Handles known to be terminated; never present again under any key
    terminated: HashSet<ActorHandle>,
}

impl MergedView {
    /// An empty view
    pub fn new() -> Self {
        Self::default()
    }

    /// How much of every origin's stream has been applied
    pub fn observed(&self) -> &VersionVector {
        &self.observed
    }

    /// Apply one entry, local or merged-remote.
    ///
    /// Entries must arrive in per-origin sequence order. Duplicates are
    /// dropped silently; gaps are dropped with a `warn!` diagnostic and a
    /// `plexspaces_reception_protocol_violations_total` counter.
    pub fn apply(&mut self, entry: &OpLogEntry) -> Applied {
        let seen = self.observed.observed(&entry.origin);
        if entry.seq_nr <= seen {
            return Applied::Duplicate;
        }
        if entry.seq_nr > seen + 1 {
            warn!(
                origin = %entry.origin,
                seq_nr = entry.seq_nr,
                expected = seen + 1,
                "dropping out-of-causal-order log entry"
            );
            metrics::counter!("plexspaces_reception_protocol_violations_total",
                "origin" => entry.origin.to_string())
            .increment(1);
            return Applied::Gap { expected: seen + 1 };
        }
        self.observed.advance_to(&entry.origin, entry.seq_nr);

        let state = self
            .pairs
            .entry(entry.key.clone())
            .or_default()
            .entry(entry.handle.clone())
            .or_default();
        state.record(&entry.origin, entry.seq_nr, entry.kind);
        let present = state.resolves_present() && !self.terminated.contains(&entry.handle);

        if self.materialize(&entry.key, &entry.handle, present) {
            Applied::Changed {
                key: entry.key.clone(),
            }
        } else {
            Applied::Unchanged
        }
    }

    /// Sync the materialized sets with a pair's resolved presence.
    /// Returns true when membership actually changed.
    fn materialize(&mut self, key: &ServiceKey, handle: &ActorHandle, present: bool) -> bool {
        let set = self.keys.entry(key.clone()).or_default();
        if present {
            let inserted = set.insert(handle.clone());
            if inserted {
                self.by_handle
                    .entry(handle.clone())
                    .or_default()
                    .insert(key.clone());
            }
            inserted
        } else {
            let removed = set.remove(handle);
            if removed {
                if let Some(keys) = self.by_handle.get_mut(handle) {
                    keys.remove(key);
                    if keys.is_empty() {
                        self.by_handle.remove(handle);
                    }
                }
            }
            removed
        }
    }

    /// Exclude a terminated handle from every key.
    ///
    /// Returns the keys the handle was present under, so the caller can
    /// schedule listing flushes and synthesize remove operations for
    /// replication.
    pub fn mark_terminated(&mut self, handle: &ActorHandle) -> Vec<ServiceKey> {
        self.terminated.insert(handle.clone());
        let affected: Vec<ServiceKey> = self
            .by_handle
            .remove(handle)
            .map(|keys| keys.into_iter().collect())
            .unwrap_or_default();
        for key in &affected {
            if let Some(set) = self.keys.get_mut(key) {
                set.remove(handle);
            }
        }
        affected
    }

    /// Current handle set for a key (empty set for unknown keys)
    pub fn lookup(&self, key: &ServiceKey) -> BTreeSet<ActorHandle> {
        self.keys.get(key).cloned().unwrap_or_default()
    }

    /// True when `handle` is currently present under `key`
    pub fn contains(&self, key: &ServiceKey, handle: &ActorHandle) -> bool {
        self.keys
            .get(key)
            .map(|set| set.contains(handle))
            .unwrap_or(false)
    }

    /// Keys a handle is currently present under
    pub fn keys_of(&self, handle: &ActorHandle) -> Vec<ServiceKey> {
        self.by_handle
            .get(handle)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// All currently present handles that live on `node`
    pub fn handles_on_node(&self, node: &NodeId) -> Vec<ActorHandle> {
        self.by_handle
            .keys()
            .filter(|handle| handle.node() == node)
            .cloned()
            .collect()
    }

    /// True when `handle` is known to be terminated
    pub fn is_terminated(&self, handle: &ActorHandle) -> bool {
        self.terminated.contains(handle)
    }
}
