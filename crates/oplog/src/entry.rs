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

//! Operation log entries

use chrono::{DateTime, Utc};
use plexspaces_reception_core::{ActorHandle, NodeId, ServiceKey};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two operations a receptionist replicates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpKind {
    /// Associate a handle with a key
    Register,
    /// Dissociate a handle from a key
    Remove,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::Register => f.write_str("register"),
            OpKind::Remove => f.write_str("remove"),
        }
    }
}

/// One operation in a node's append-only log
///
/// `seq_nr` is strictly increasing per `origin` with no gaps, starting at 1.
/// It is the causal marker for that node's stream; the `timestamp` is
/// diagnostic only and never used for conflict resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpLogEntry {
    /// Node whose log this entry belongs to
    pub origin: NodeId,
    /// Position in the origin's stream, starting at 1
    pub seq_nr: u64,
    /// Register or remove
    pub kind: OpKind,
    /// Key the operation applies to
    pub key: ServiceKey,
    /// Handle the operation applies to
    pub handle: ActorHandle,
    /// Wall-clock time the entry was appended (diagnostic only)
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for OpLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{} {} {} -> {}",
            self.origin, self.seq_nr, self.kind, self.handle, self.key
        )
    }
}
