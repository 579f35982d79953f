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

//! Per-origin version vectors
//!
//! A vector maps each origin node to the highest sequence number observed
//! contiguously from that origin. Gossip exchanges vectors to decide which
//! log suffix a peer is missing, and the intersection of peer vectors
//! bounds what may be compacted away.

use plexspaces_reception_core::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Map of origin node to highest contiguously observed sequence number
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionVector {
    clocks: BTreeMap<NodeId, u64>,
}

impl VersionVector {
    /// An empty vector (nothing observed from anyone)
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest sequence number observed from `origin`, 0 if never seen
    pub fn observed(&self, origin: &NodeId) -> u64 {
        self.clocks.get(origin).copied().unwrap_or(0)
    }

    /// Record that `origin`'s stream has been observed through `seq_nr`.
    /// Never regresses: a lower value than already recorded is ignored.
    pub fn advance_to(&mut self, origin: &NodeId, seq_nr: u64) {
        let clock = self.clocks.entry(origin.clone()).or_insert(0);
        if seq_nr > *clock {
            *clock = seq_nr;
        }
    }

    /// Pointwise maximum with `other`
    pub fn merge(&mut self, other: &VersionVector) {
        for (origin, seq_nr) in &other.clocks {
            self.advance_to(origin, *seq_nr);
        }
    }

    /// Pointwise minimum with `other`, over the union of origins.
    /// An origin missing on either side floors to 0 and is dropped.
    pub fn floor(&self, other: &VersionVector) -> VersionVector {
        let mut clocks = BTreeMap::new();
        for (origin, seq_nr) in &self.clocks {
            let min = (*seq_nr).min(other.observed(origin));
            if min > 0 {
                clocks.insert(origin.clone(), min);
            }
        }
        VersionVector { clocks }
    }

    /// True when this vector has observed at least as much as `other`
    /// from every origin
    pub fn dominates(&self, other: &VersionVector) -> bool {
        other
            .clocks
            .iter()
            .all(|(origin, seq_nr)| self.observed(origin) >= *seq_nr)
    }

    /// Iterate over `(origin, highest observed)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, u64)> {
        self.clocks.iter().map(|(origin, seq_nr)| (origin, *seq_nr))
    }

    /// True when nothing has been observed from any origin
    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }
}
