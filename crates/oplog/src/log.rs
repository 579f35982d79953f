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

//! The node-local operation log store
//!
//! ## Purpose
//! Holds this node's own append-only stream plus every remote entry retained
//! for re-export, so gossip can forward third-party operations transitively.
//! Entries all peers have acknowledged are compacted away; a peer that is
//! missing more than the retained tail is healed by re-registration plus
//! subsequent gossip (state is never persisted).

use crate::{OpKind, OpLogEntry, VersionVector};
use chrono::Utc;
use plexspaces_reception_core::{ActorHandle, NodeId, ServiceKey};
use std::collections::BTreeMap;
use tracing::debug;

/// Append-only operation store for one node
#[derive(Debug)]
pub struct OpLog {
    /// This node's id; appends originate here
    node: NodeId,
    /// Next sequence number to assign to an own append (starts at 1)
    next_seq: u64,
    /// Retained entries per origin, ascending by sequence number
    entries: BTreeMap<NodeId, Vec<OpLogEntry>>,
    /// Highest sequence number ever retained per origin (survives compaction)
    highest: VersionVector,
}

impl OpLog {
    /// Create an empty log owned by `node`
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            next_seq: 1,
            entries: BTreeMap::new(),
            highest: VersionVector::new(),
        }
    }

    /// The owning node
    pub fn node(&self) -> &NodeId {
        &self.node
    }

    /// Append an operation to this node's own stream, assigning the next
    /// sequence number
    pub fn append(&mut self, kind: OpKind, key: ServiceKey, handle: ActorHandle) -> OpLogEntry {
        let entry = OpLogEntry {
            origin: self.node.clone(),
            seq_nr: self.next_seq,
            kind,
            key,
            handle,
            timestamp: Utc::now(),
        };
        self.next_seq += 1;
        self.highest.advance_to(&entry.origin, entry.seq_nr);
        self.entries
            .entry(entry.origin.clone())
            .or_default()
            .push(entry.clone());
        entry
    }

    /// Retain a merged remote entry for transitive re-export.
    ///
    /// Callers apply entries to the merged view first; only entries the view
    /// accepted (in per-origin order) are retained, so each origin's vector
    /// stays contiguous and duplicates never land here.
    pub fn retain_remote(&mut self, entry: OpLogEntry) {
        if entry.seq_nr <= self.highest.observed(&entry.origin) {
            return;
        }
        self.highest.advance_to(&entry.origin, entry.seq_nr);
        self.entries
            .entry(entry.origin.clone())
            .or_default()
            .push(entry);
    }

    /// Highest retained sequence number per origin
    pub fn version_vector(&self) -> &VersionVector {
        &self.highest
    }

    /// Every retained entry above `since`, grouped per origin in ascending
    /// sequence order — the suffix a peer with vector `since` is missing
    pub fn export_tail(&self, since: &VersionVector) -> Vec<OpLogEntry> {
        let mut tail = Vec::new();
        for (origin, entries) in &self.entries {
            let seen = since.observed(origin);
            for entry in entries {
                if entry.seq_nr > seen {
                    tail.push(entry.clone());
                }
            }
        }
        tail
    }

    /// Total retained entries across all origins
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// True when nothing is retained
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry all peers have acknowledged, per `acked` (the
    /// pointwise minimum of the peers' observed vectors). Returns how many
    /// entries were dropped.
    pub fn compact(&mut self, acked: &VersionVector) -> usize {
        let mut dropped = 0;
        for (origin, entries) in self.entries.iter_mut() {
            let safe = acked.observed(origin);
            if safe == 0 {
                continue;
            }
            let before = entries.len();
            entries.retain(|entry| entry.seq_nr > safe);
            dropped += before - entries.len();
        }
        self.entries.retain(|_, entries| !entries.is_empty());
        if dropped > 0 {
            debug!(node = %self.node, dropped, retained = self.len(), "compacted operation log");
        }
        dropped
    }
}
