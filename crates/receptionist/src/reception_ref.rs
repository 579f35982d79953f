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

//! ReceptionistRef - cheap-clone handle to a receptionist instance
//!
//! ## Purpose
//! Wraps the receptionist's mailbox sender behind a typed tell/ask API.
//! Tell operations enqueue and return immediately; ask operations
//! (lookup, acknowledged registration, tail export) wait for a oneshot
//! reply under the configured ask timeout, which is surfaced to the caller
//! rather than retried internally.

use crate::messages::{ReceptionMessage, TailExport};
use plexspaces_oplog::{OpLogEntry, VersionVector};
use plexspaces_reception_core::{
    ActorHandle, Listing, NodeId, ReceptionError, Registered, ServiceKey,
};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Cloneable handle for sending requests into a receptionist
#[derive(Clone)]
pub struct ReceptionistRef {
    node: NodeId,
    tx: mpsc::UnboundedSender<ReceptionMessage>,
    ask_timeout: Duration,
}

impl ReceptionistRef {
    pub(crate) fn new(
        node: NodeId,
        tx: mpsc::UnboundedSender<ReceptionMessage>,
        ask_timeout: Duration,
    ) -> Self {
        Self {
            node,
            tx,
            ask_timeout,
        }
    }

    /// Node this receptionist instance belongs to
    pub fn node(&self) -> &NodeId {
        &self.node
    }

    /// True once the receptionist loop has stopped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Enqueue a raw message (fire-and-forget)
    pub fn tell(&self, message: ReceptionMessage) -> Result<(), ReceptionError> {
        self.tx
            .send(message)
            .map_err(|_| ReceptionError::Unavailable(format!("receptionist on {} stopped", self.node)))
    }

    async fn ask<T>(&self, rx: oneshot::Receiver<T>) -> Result<T, ReceptionError> {
        match tokio::time::timeout(self.ask_timeout, rx).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(ReceptionError::Unavailable(format!(
                "receptionist on {} dropped the reply",
                self.node
            ))),
            Err(_) => Err(ReceptionError::AskTimeout(self.ask_timeout)),
        }
    }

    /// Register `handle` under `key` (fire-and-forget, idempotent)
    pub fn register(&self, key: ServiceKey, handle: ActorHandle) -> Result<(), ReceptionError> {
        self.tell(ReceptionMessage::Register {
            key,
            handle,
            reply_to: None,
        })
    }

    /// Register and wait for the [`Registered`] acknowledgment
    pub async fn register_acked(
        &self,
        key: ServiceKey,
        handle: ActorHandle,
    ) -> Result<Registered, ReceptionError> {
        let (reply_to, rx) = oneshot::channel();
        self.tell(ReceptionMessage::Register {
            key,
            handle,
            reply_to: Some(reply_to),
        })?;
        self.ask(rx).await
    }

    /// Remove `handle` from `key` (no-op when unknown)
    pub fn remove(&self, key: ServiceKey, handle: ActorHandle) -> Result<(), ReceptionError> {
        self.tell(ReceptionMessage::Remove { key, handle })
    }

    /// Snapshot the current listing for `key`
    pub async fn lookup(&self, key: ServiceKey) -> Result<Listing, ReceptionError> {
        let (reply_to, rx) = oneshot::channel();
        self.tell(ReceptionMessage::Lookup { key, reply_to })?;
        self.ask(rx).await
    }

    /// Subscribe `subscriber` to listings for `key`
    pub fn subscribe(&self, key: ServiceKey, subscriber: ActorHandle) -> Result<(), ReceptionError> {
        self.tell(ReceptionMessage::Subscribe { key, subscriber })
    }

    /// Drop `subscriber`'s subscription to `key`
    pub fn unsubscribe(
        &self,
        key: ServiceKey,
        subscriber: ActorHandle,
    ) -> Result<(), ReceptionError> {
        self.tell(ReceptionMessage::Unsubscribe { key, subscriber })
    }

    /// Notify the receptionist that a watched handle terminated
    pub fn terminated(&self, handle: ActorHandle) -> Result<(), ReceptionError> {
        self.tell(ReceptionMessage::Terminated { handle })
    }

    /// Notify the receptionist that a cluster node went down
    pub fn node_down(&self, node: NodeId) -> Result<(), ReceptionError> {
        self.tell(ReceptionMessage::NodeDown { node })
    }

    /// Merge an inbound log tail from a peer
    pub fn import_tail(
        &self,
        from: NodeId,
        observed: VersionVector,
        entries: Vec<OpLogEntry>,
    ) -> Result<(), ReceptionError> {
        self.tell(ReceptionMessage::GossipTail {
            from,
            observed,
            entries,
        })
    }

    /// Export the log tail `peer` is missing (used by the gossip driver)
    pub async fn export_tail_for(&self, peer: NodeId) -> Result<TailExport, ReceptionError> {
        let (reply_to, rx) = oneshot::channel();
        self.tell(ReceptionMessage::TailRequest { peer, reply_to })?;
        self.ask(rx).await
    }

    /// Stop the receptionist loop
    pub fn stop(&self) -> Result<(), ReceptionError> {
        self.tell(ReceptionMessage::Stop)
    }
}
