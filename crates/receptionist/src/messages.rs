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

//! Receptionist message surface
//!
//! ## Purpose
//! Every way into the receptionist — caller requests, replication input,
//! termination notifications, membership events and self-addressed flush
//! timers — is one variant of [`ReceptionMessage`], processed by a single
//! exhaustive match in the actor's message loop.

use plexspaces_oplog::{OpLogEntry, VersionVector};
use plexspaces_reception_core::{ActorHandle, Listing, NodeId, Registered, ServiceKey};
use tokio::sync::oneshot;

/// A log tail exported for one peer: what we have observed, and the entries
/// that peer is missing
#[derive(Debug)]
pub struct TailExport {
    /// This node's observed version vector at export time
    pub observed: VersionVector,
    /// The suffix the requesting peer has not acknowledged yet
    pub entries: Vec<OpLogEntry>,
}

/// Messages processed by the receptionist's single serialized queue
#[derive(Debug)]
pub enum ReceptionMessage {
    /// Register `handle` under `key`; idempotent. `reply_to` receives an
    /// acknowledgment when provided.
    Register {
        /// Key to register under
        key: ServiceKey,
        /// Handle to register
        handle: ActorHandle,
        /// Optional acknowledgment channel
        reply_to: Option<oneshot::Sender<Registered>>,
    },
    /// Remove `handle` from `key`; unknown pairs are a no-op
    Remove {
        /// Key to remove from
        key: ServiceKey,
        /// Handle to remove
        handle: ActorHandle,
    },
    /// Snapshot the current listing for `key`
    Lookup {
        /// Key to look up
        key: ServiceKey,
        /// Reply channel for the snapshot
        reply_to: oneshot::Sender<Listing>,
    },
    /// Subscribe `subscriber` to listings for `key`. The first listing
    /// (possibly empty) is delivered immediately, never delayed.
    Subscribe {
        /// Key to subscribe to
        key: ServiceKey,
        /// Subscriber handle listings are delivered to
        subscriber: ActorHandle,
    },
    /// Drop `subscriber`'s subscription to `key`; unknown subscribers are a
    /// no-op
    Unsubscribe {
        /// Key to unsubscribe from
        key: ServiceKey,
        /// Subscriber to drop
        subscriber: ActorHandle,
    },
    /// A watched handle became permanently unreachable
    Terminated {
        /// The terminated handle
        handle: ActorHandle,
    },
    /// A cluster node went down; everything registered from it is removed
    NodeDown {
        /// The downed node
        node: NodeId,
    },
    /// Inbound log tail from a peer
    GossipTail {
        /// Sending peer
        from: NodeId,
        /// The peer's observed vector at send time (doubles as its ack)
        observed: VersionVector,
        /// The entries the peer believes we are missing
        entries: Vec<OpLogEntry>,
    },
    /// Gossip driver pull: export the tail `peer` is missing
    TailRequest {
        /// Peer the export is destined for
        peer: NodeId,
        /// Reply channel for the export
        reply_to: oneshot::Sender<TailExport>,
    },
    /// Self-addressed flush timer firing for `key`
    FlushKey {
        /// Key whose pending flush expired
        key: ServiceKey,
    },
    /// Stop the receptionist loop
    Stop,
}
