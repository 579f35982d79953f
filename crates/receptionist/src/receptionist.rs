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

//! The receptionist actor
//!
//! ## Purpose
//! Owns the local registry state — operation log, merged view,
//! subscriptions, flush timers — behind one serialized message queue.
//! Local mutations, merged-remote entries and termination notifications
//! all flow through the same apply path, so replication is
//! observationally indistinguishable from local mutation.
//!
//! ## Flush batching
//! Per key, the flush state machine is `Idle → Pending → Idle`: the first
//! mutation spawns a timer that posts a self-addressed `FlushKey`; further
//! mutations within the window coalesce. A burst of N mutations yields one
//! listing delivery reflecting the state after all N. The only exception
//! is a fresh subscription, which receives the current (possibly empty)
//! listing immediately so subscribers never wait for a first event.

use crate::messages::{ReceptionMessage, TailExport};
use crate::runtime::ActorRuntime;
use crate::ReceptionistRef;
use plexspaces_oplog::{Applied, MergedView, OpKind, OpLog, VersionVector};
use plexspaces_reception_core::{
    ActorHandle, Listing, NodeId, ReceptionistConfig, Registered, ServiceKey,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// The single-writer service-discovery actor
///
/// All state is owned by the message loop; there is no internal locking.
pub struct Receptionist {
    node: NodeId,
    config: ReceptionistConfig,
    runtime: Arc<dyn ActorRuntime>,
    rx: mpsc::UnboundedReceiver<ReceptionMessage>,
    self_tx: mpsc::UnboundedSender<ReceptionMessage>,
    log: OpLog,
    view: MergedView,
    /// Per key: subscriber -> version of the last listing delivered to it
    subscriptions: HashMap<ServiceKey, BTreeMap<ActorHandle, u64>>,
    /// Reverse index for subscriber termination cleanup
    subscriber_keys: HashMap<ActorHandle, HashSet<ServiceKey>>,
    /// Keys with a scheduled, not-yet-fired flush timer
    pending_flush: HashSet<ServiceKey>,
    /// Per-key version stamp, advanced on every applied mutation
    key_versions: HashMap<ServiceKey, u64>,
    /// Handles already placed under termination watch
    watched: HashSet<ActorHandle>,
    /// Latest observed vector each peer reported (its acknowledgment)
    peer_views: HashMap<NodeId, VersionVector>,
}

impl Receptionist {
    /// Spawn a receptionist instance for `node` and return its ref
    pub fn spawn(
        node: NodeId,
        config: ReceptionistConfig,
        runtime: Arc<dyn ActorRuntime>,
    ) -> ReceptionistRef {
        let (tx, rx) = mpsc::unbounded_channel();
        let ask_timeout = config.ask_timeout;
        let receptionist = Self {
            node: node.clone(),
            log: OpLog::new(node.clone()),
            view: MergedView::new(),
            subscriptions: HashMap::new(),
            subscriber_keys: HashMap::new(),
            pending_flush: HashSet::new(),
            key_versions: HashMap::new(),
            watched: HashSet::new(),
            peer_views: HashMap::new(),
            self_tx: tx.clone(),
            config,
            runtime,
            rx,
        };
        tokio::spawn(receptionist.run());
        ReceptionistRef::new(node, tx, ask_timeout)
    }

    async fn run(mut self) {
        debug!(node = %self.node, "receptionist started");
        while let Some(message) = self.rx.recv().await {
            if !self.handle(message).await {
                break;
            }
        }
        debug!(node = %self.node, "receptionist stopped");
    }

    /// One exhaustive match over the message surface; returns false to stop
    async fn handle(&mut self, message: ReceptionMessage) -> bool {
        match message {
            ReceptionMessage::Register {
                key,
                handle,
                reply_to,
            } => self.handle_register(key, handle, reply_to).await,
            ReceptionMessage::Remove { key, handle } => self.handle_remove(key, handle),
            ReceptionMessage::Lookup { key, reply_to } => {
                let _ = reply_to.send(self.current_listing(&key));
            }
            ReceptionMessage::Subscribe { key, subscriber } => {
                self.handle_subscribe(key, subscriber).await
            }
            ReceptionMessage::Unsubscribe { key, subscriber } => {
                self.handle_unsubscribe(&key, &subscriber)
            }
            ReceptionMessage::Terminated { handle } => self.handle_terminated(handle),
            ReceptionMessage::NodeDown { node } => self.handle_node_down(node),
            ReceptionMessage::GossipTail {
                from,
                observed,
                entries,
            } => self.handle_gossip_tail(from, observed, entries),
            ReceptionMessage::TailRequest { peer, reply_to } => {
                let _ = reply_to.send(self.export_tail_for(&peer));
            }
            ReceptionMessage::FlushKey { key } => self.handle_flush(&key).await,
            ReceptionMessage::Stop => return false,
        }
        true
    }

    async fn handle_register(
        &mut self,
        key: ServiceKey,
        handle: ActorHandle,
        reply_to: Option<tokio::sync::oneshot::Sender<Registered>>,
    ) {
        // Watch on first sight, even for duplicate registrations
        self.watch_if_new(&handle).await;

        if self.view.is_terminated(&handle) {
            trace!(key = %key, handle = %handle, "ignoring registration of terminated handle");
        } else if self.view.contains(&key, &handle) {
            trace!(key = %key, handle = %handle, "duplicate registration ignored");
        } else {
            let entry = self.log.append(OpKind::Register, key.clone(), handle.clone());
            if let Applied::Changed { key } = self.view.apply(&entry) {
                self.note_mutation(&key);
            }
            metrics::counter!("plexspaces_reception_registrations_total",
                "node" => self.node.to_string())
            .increment(1);
            debug!(key = %key, handle = %handle, "handle registered");
        }

        if let Some(reply_to) = reply_to {
            let _ = reply_to.send(Registered { key, handle });
        }
    }

    fn handle_remove(&mut self, key: ServiceKey, handle: ActorHandle) {
        // Unknown (key, handle) pairs are a no-op, not an error
        if !self.view.contains(&key, &handle) {
            trace!(key = %key, handle = %handle, "remove of unregistered handle ignored");
            return;
        }
        let entry = self.log.append(OpKind::Remove, key.clone(), handle.clone());
        if let Applied::Changed { key } = self.view.apply(&entry) {
            self.note_mutation(&key);
        }
        metrics::counter!("plexspaces_reception_removals_total",
            "node" => self.node.to_string())
        .increment(1);
    }

    async fn handle_subscribe(&mut self, key: ServiceKey, subscriber: ActorHandle) {
        self.watch_if_new(&subscriber).await;

        // First listing is immediate, never delayed, so subscribers never
        // block waiting for an initial event
        let listing = self.current_listing(&key);
        let version = listing.version();
        if let Err(err) = self.runtime.send_listing(&subscriber, listing).await {
            debug!(key = %key, subscriber = %subscriber, error = %err, "initial listing delivery failed");
        }
        trace!(key = %key, subscriber = %subscriber, "subscribed");

        self.subscriptions
            .entry(key.clone())
            .or_default()
            .insert(subscriber.clone(), version);
        self.subscriber_keys
            .entry(subscriber)
            .or_default()
            .insert(key);
    }

    fn handle_unsubscribe(&mut self, key: &ServiceKey, subscriber: &ActorHandle) {
        if let Some(subscribers) = self.subscriptions.get_mut(key) {
            subscribers.remove(subscriber);
            if subscribers.is_empty() {
                self.subscriptions.remove(key);
            }
        }
        if let Some(keys) = self.subscriber_keys.get_mut(subscriber) {
            keys.remove(key);
            if keys.is_empty() {
                self.subscriber_keys.remove(subscriber);
            }
        }
    }

    /// Termination feeds the same log/apply path as an explicit remove, so
    /// the cleanup replicates to peers like any other operation
    fn handle_terminated(&mut self, handle: ActorHandle) {
        let span = tracing::span!(tracing::Level::DEBUG, "reception.terminated", handle = %handle);
        let _guard = span.enter();

        self.watched.remove(&handle);

        // Subscriber side: subscriptions are node-local, dropped silently
        if let Some(keys) = self.subscriber_keys.remove(&handle) {
            for key in keys {
                if let Some(subscribers) = self.subscriptions.get_mut(&key) {
                    subscribers.remove(&handle);
                    if subscribers.is_empty() {
                        self.subscriptions.remove(&key);
                    }
                }
            }
        }

        // Registered side: synthesize a remove for every key it occupied
        let affected = self.view.mark_terminated(&handle);
        if affected.is_empty() {
            return;
        }
        for key in affected {
            let entry = self.log.append(OpKind::Remove, key.clone(), handle.clone());
            // already absent from the view; this advances our own stream
            let _ = self.view.apply(&entry);
            self.note_mutation(&key);
        }
        metrics::counter!("plexspaces_reception_terminations_total",
            "node" => self.node.to_string())
        .increment(1);
        debug!("terminated handle removed from all keys");
    }

    /// A downed node takes every handle it hosted with it
    fn handle_node_down(&mut self, node: NodeId) {
        let mut doomed: HashSet<ActorHandle> =
            self.view.handles_on_node(&node).into_iter().collect();
        doomed.extend(
            self.subscriber_keys
                .keys()
                .filter(|handle| handle.node() == &node)
                .cloned(),
        );
        debug!(node = %node, handles = doomed.len(), "node down, removing its handles");
        for handle in doomed {
            self.handle_terminated(handle);
        }
        self.peer_views.remove(&node);
    }

    /// Merge a peer's log tail; observationally identical to local mutation
    fn handle_gossip_tail(
        &mut self,
        from: NodeId,
        observed: VersionVector,
        entries: Vec<plexspaces_oplog::OpLogEntry>,
    ) {
        let span = tracing::span!(tracing::Level::DEBUG, "reception.gossip_merge", from = %from);
        let _guard = span.enter();

        self.peer_views.entry(from).or_default().merge(&observed);

        let mut gapped: HashSet<NodeId> = HashSet::new();
        let mut applied = 0usize;
        for entry in entries {
            // once an origin's stream gaps, the rest of its batch would
            // gap too; skip without repeating the diagnostic
            if gapped.contains(&entry.origin) {
                continue;
            }
            match self.view.apply(&entry) {
                Applied::Changed { key } => {
                    self.log.retain_remote(entry);
                    self.note_mutation(&key);
                    applied += 1;
                }
                Applied::Unchanged => {
                    self.log.retain_remote(entry);
                    applied += 1;
                }
                Applied::Duplicate => {}
                Applied::Gap { .. } => {
                    gapped.insert(entry.origin.clone());
                }
            }
        }
        if applied > 0 {
            trace!(applied, "merged gossip tail");
            metrics::counter!("plexspaces_reception_merged_entries_total",
                "node" => self.node.to_string())
            .increment(applied as u64);
        }
        self.maybe_compact();
    }

    fn export_tail_for(&self, peer: &NodeId) -> TailExport {
        let since = self.peer_views.get(peer).cloned().unwrap_or_default();
        TailExport {
            observed: self.view.observed().clone(),
            entries: self.log.export_tail(&since),
        }
    }

    /// Deliver the coalesced listing for a key whose flush timer fired
    async fn handle_flush(&mut self, key: &ServiceKey) {
        self.pending_flush.remove(key);
        let listing = self.current_listing(key);
        let version = listing.version();

        let targets: Vec<ActorHandle> = match self.subscriptions.get(key) {
            Some(subscribers) => subscribers
                .iter()
                .filter(|(_, delivered)| **delivered < version)
                .map(|(handle, _)| handle.clone())
                .collect(),
            None => return,
        };

        let mut delivered = 0usize;
        for subscriber in targets {
            if self
                .runtime
                .send_listing(&subscriber, listing.clone())
                .await
                .is_ok()
            {
                delivered += 1;
            }
            if let Some(subscribers) = self.subscriptions.get_mut(key) {
                if let Some(last) = subscribers.get_mut(&subscriber) {
                    *last = version;
                }
            }
        }
        trace!(key = %key, version, delivered, "flushed listing");
        metrics::histogram!("plexspaces_reception_listing_fanout").record(delivered as f64);
    }

    /// Advance the key's version stamp and arm its flush timer
    fn note_mutation(&mut self, key: &ServiceKey) {
        *self.key_versions.entry(key.clone()).or_insert(0) += 1;
        self.schedule_flush(key);
    }

    /// Idle -> Pending; a key already Pending coalesces (no second timer)
    fn schedule_flush(&mut self, key: &ServiceKey) {
        if !self.pending_flush.insert(key.clone()) {
            return;
        }
        let tx = self.self_tx.clone();
        let key = key.clone();
        let delay = self.config.flush_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(ReceptionMessage::FlushKey { key });
        });
    }

    fn current_listing(&self, key: &ServiceKey) -> Listing {
        Listing::new(
            key.clone(),
            self.view.lookup(key),
            self.key_versions.get(key).copied().unwrap_or(0),
        )
    }

    async fn watch_if_new(&mut self, handle: &ActorHandle) {
        if self.watched.insert(handle.clone()) {
            self.runtime.watch(handle).await;
        }
    }

    /// Compact the fully-acknowledged log prefix once the retained tail
    /// outgrows the configured threshold
    fn maybe_compact(&mut self) {
        if self.peer_views.is_empty() || self.log.len() <= self.config.compaction_threshold {
            return;
        }
        let mut peers = self.peer_views.values();
        let mut acked = peers.next().cloned().unwrap_or_default();
        for vector in peers {
            acked = acked.floor(vector);
        }
        let dropped = self.log.compact(&acked);
        if dropped > 0 {
            metrics::counter!("plexspaces_reception_compacted_entries_total",
                "node" => self.node.to_string())
            .increment(dropped as u64);
        }
    }
}
