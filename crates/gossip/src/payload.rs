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

//! Gossip wire payloads

use plexspaces_oplog::{OpLogEntry, VersionVector};
use plexspaces_reception_core::NodeId;
use serde::{Deserialize, Serialize};

/// One gossip exchange message
///
/// The sender's `observed` vector rides along with every tail. It tells the
/// receiver how much of each origin's stream the sender has applied, which
/// doubles as the acknowledgment that drives suffix computation and log
/// compaction on the receiving side.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum GossipPayload {
    /// A log tail push
    Tail {
        /// Sending node
        from: NodeId,
        /// Sender's observed version vector at push time
        observed: VersionVector,
        /// Entries the sender believes the receiver is missing
        entries: Vec<OpLogEntry>,
    },
}

impl GossipPayload {
    /// Encode for a byte transport
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode from a byte transport
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
