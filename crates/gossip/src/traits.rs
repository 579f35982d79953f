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

//! Membership and transport collaborator seams
//!
//! ## Purpose
//! The gossip driver neither discovers peers nor moves bytes itself. The
//! membership subsystem decides the candidate set (and delivers node-down
//! events straight to the receptionist); the transport provides a
//! reliable-ish fire-and-forget point-to-point send.

use crate::GossipPayload;
use async_trait::async_trait;
use plexspaces_reception_core::NodeId;
use thiserror::Error;
use tokio::sync::RwLock;

/// Error types for gossip operations
#[derive(Debug, Error)]
pub enum GossipError {
    /// The peer could not be reached; the driver skips it and retries on
    /// the next scheduled cycle
    #[error("peer {peer} unreachable: {reason}")]
    PeerUnreachable {
        /// The peer that could not be reached
        peer: NodeId,
        /// Transport-level failure description
        reason: String,
    },

    /// Payload could not be encoded or decoded
    #[error("codec error: {0}")]
    Codec(String),
}

/// Peer discovery capability supplied by the membership subsystem
#[async_trait]
pub trait ClusterMembership: Send + Sync {
    /// The current gossip candidate set, excluding the local node
    async fn current_peers(&self) -> Vec<NodeId>;
}

/// Reliable-ish point-to-point send capability supplied by the transport
#[async_trait]
pub trait GossipTransport: Send + Sync {
    /// Deliver a payload to a peer, fire-and-forget
    async fn send(&self, peer: &NodeId, payload: GossipPayload) -> Result<(), GossipError>;
}

/// Fixed peer set for tests and static deployments
#[derive(Default)]
pub struct StaticMembership {
    peers: RwLock<Vec<NodeId>>,
}

impl StaticMembership {
    /// Membership with an initial peer set
    pub fn new(peers: Vec<NodeId>) -> Self {
        Self {
            peers: RwLock::new(peers),
        }
    }

    /// Replace the peer set
    pub async fn set_peers(&self, peers: Vec<NodeId>) {
        *self.peers.write().await = peers;
    }
}

#[async_trait]
impl ClusterMembership for StaticMembership {
    async fn current_peers(&self) -> Vec<NodeId> {
        self.peers.read().await.clone()
    }
}
