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

//! Listing snapshots and registration acknowledgments

use crate::{ActorHandle, ServiceKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Immutable snapshot of the handles registered under a key
///
/// ## Versioning
/// Every listing carries the key's version stamp at snapshot time. Versions
/// advance on every applied mutation, so the stamps a subscriber observes
/// for one key are strictly increasing and a listing never regresses to
/// older information after a newer one was delivered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    key: ServiceKey,
    handles: BTreeSet<ActorHandle>,
    version: u64,
}

impl Listing {
    /// Create a listing snapshot
    pub fn new(key: ServiceKey, handles: BTreeSet<ActorHandle>, version: u64) -> Self {
        Self {
            key,
            handles,
            version,
        }
    }

    /// The key this listing describes
    pub fn key(&self) -> &ServiceKey {
        &self.key
    }

    /// The registered handles, in deterministic order
    pub fn handles(&self) -> &BTreeSet<ActorHandle> {
        &self.handles
    }

    /// Version stamp at snapshot time
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of registered handles
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// True when no handles are registered
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// True when `handle` is part of this snapshot
    pub fn contains(&self, handle: &ActorHandle) -> bool {
        self.handles.contains(handle)
    }

    /// Iterate over the handles
    pub fn iter(&self) -> impl Iterator<Item = &ActorHandle> {
        self.handles.iter()
    }
}

/// Acknowledgment sent to callers that requested one on registration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registered {
    /// The key the handle was registered under
    pub key: ServiceKey,
    /// The registered handle
    pub handle: ActorHandle,
}
