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

//! In-memory gossip transport
//!
//! Routes payloads straight into the target node's receptionist queue.
//! Used by tests and single-process multi-node setups; a networked
//! deployment supplies its own [`GossipTransport`] over the bytes form of
//! [`GossipPayload`].

use crate::{GossipError, GossipPayload, GossipTransport};
use async_trait::async_trait;
use plexspaces_reception_core::NodeId;
use plexspaces_receptionist::ReceptionistRef;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Transport that delivers payloads to co-located receptionists
#[derive(Default)]
pub struct InMemoryTransport {
    routes: RwLock<HashMap<NodeId, ReceptionistRef>>,
}

impl InMemoryTransport {
    /// An empty routing table
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `node`'s inbound gossip to `receptionist`
    pub async fn register_node(&self, node: NodeId, receptionist: ReceptionistRef) {
        self.routes.write().await.insert(node, receptionist);
    }

    /// Drop a node's route (simulates the node becoming unreachable)
    pub async fn unregister_node(&self, node: &NodeId) {
        self.routes.write().await.remove(node);
    }
}

#[async_trait]
impl GossipTransport for InMemoryTransport {
    async fn send(&self, peer: &NodeId, payload: GossipPayload) -> Result<(), GossipError> {
        let routes = self.routes.read().await;
        let receptionist = routes.get(peer).ok_or_else(|| GossipError::PeerUnreachable {
            peer: peer.clone(),
            reason: "no route".to_string(),
        })?;
        let GossipPayload::Tail {
            from,
            observed,
            entries,
        } = payload;
        receptionist
            .import_tail(from, observed, entries)
            .map_err(|err| GossipError::PeerUnreachable {
                peer: peer.clone(),
                reason: err.to_string(),
            })
    }
}
