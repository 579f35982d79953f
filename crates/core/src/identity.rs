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

//! Node and actor identity types
//!
//! ## Purpose
//! Identifies cluster nodes and individual actor incarnations. The
//! receptionist never owns the actors it tracks; an [`ActorHandle`] is a
//! non-owning, comparable reference whose only lifecycle signal is a
//! termination notification from the actor runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Unique identifier of a cluster node
///
/// Node ids are operator-assigned strings (e.g. `"node-1"`), matching the
/// addressing used by the membership and transport layers.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node id from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque, comparable reference to a single actor incarnation
///
/// ## Identity Semantics
/// Two handles are equal iff they denote the same incarnation: same actor
/// id, same incarnation ulid, same node. Respawning an actor under the same
/// name yields a *different* handle, so a terminated incarnation can never
/// be confused with its successor.
///
/// ## Ownership
/// The receptionist holds handles without owning the referenced actors; the
/// termination watch is the only lifecycle signal it trusts.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorHandle {
    /// Actor id within its node (e.g. `"cache-7"`)
    actor_id: String,
    /// Unique incarnation marker, assigned at spawn time
    incarnation: Ulid,
    /// Node the actor lives on
    node: NodeId,
}

impl ActorHandle {
    /// Create a handle for a fresh actor incarnation on `node`
    pub fn new(actor_id: impl Into<String>, node: NodeId) -> Self {
        Self {
            actor_id: actor_id.into(),
            incarnation: Ulid::new(),
            node,
        }
    }

    /// Reconstruct a handle from its parts (wire round-trips, tests)
    pub fn from_parts(actor_id: impl Into<String>, incarnation: Ulid, node: NodeId) -> Self {
        Self {
            actor_id: actor_id.into(),
            incarnation,
            node,
        }
    }

    /// Actor id within its node
    pub fn actor_id(&self) -> &str {
        &self.actor_id
    }

    /// Incarnation marker
    pub fn incarnation(&self) -> Ulid {
        self.incarnation
    }

    /// Node this handle's actor lives on
    pub fn node(&self) -> &NodeId {
        &self.node
    }
}

impl fmt::Display for ActorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.actor_id, self.incarnation, self.node)
    }
}
