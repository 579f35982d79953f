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

//! The periodic gossip exchange task
//!
//! ## Purpose
//! Every `gossip_interval`, pick one peer (round-robin over the membership
//! candidate set), ask the receptionist which log suffix that peer has not
//! acknowledged, and push it. All log access stays inside the
//! receptionist's single-writer queue; the driver only shuttles.

use crate::{ClusterMembership, GossipPayload, GossipTransport};
use plexspaces_reception_core::NodeId;
use plexspaces_receptionist::ReceptionistRef;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Periodic log-tail exchange with cluster peers
pub struct GossipDriver {
    node: NodeId,
    receptionist: ReceptionistRef,
    membership: Arc<dyn ClusterMembership>,
    transport: Arc<dyn GossipTransport>,
    /// Round-robin cursor over the candidate set
    cursor: usize,
}

impl GossipDriver {
    /// Spawn the driver task for `receptionist`. The task ends on its own
    /// once the receptionist stops.
    pub fn spawn(
        receptionist: ReceptionistRef,
        membership: Arc<dyn ClusterMembership>,
        transport: Arc<dyn GossipTransport>,
        interval: std::time::Duration,
    ) -> JoinHandle<()> {
        let driver = Self {
            node: receptionist.node().clone(),
            receptionist,
            membership,
            transport,
            cursor: 0,
        };
        tokio::spawn(driver.run(interval))
    }

    async fn run(mut self, interval: std::time::Duration) {
        debug!(node = %self.node, "gossip driver started");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if self.receptionist.is_closed() {
                break;
            }
            self.gossip_round().await;
        }
        debug!(node = %self.node, "gossip driver stopped");
    }

    /// One exchange: select a peer, export its missing suffix, push it
    async fn gossip_round(&mut self) {
        let peers: Vec<NodeId> = self
            .membership
            .current_peers()
            .await
            .into_iter()
            .filter(|peer| peer != &self.node)
            .collect();
        if peers.is_empty() {
            return;
        }
        let peer = peers[self.cursor % peers.len()].clone();
        self.cursor = self.cursor.wrapping_add(1);

        let export = match self.receptionist.export_tail_for(peer.clone()).await {
            Ok(export) => export,
            Err(err) => {
                warn!(node = %self.node, error = %err, "tail export failed, skipping round");
                return;
            }
        };

        let entry_count = export.entries.len();
        let payload = GossipPayload::Tail {
            from: self.node.clone(),
            observed: export.observed,
            entries: export.entries,
        };
        // the push always goes out, even with an empty tail: the observed
        // vector is the peer's acknowledgment feed
        match self.transport.send(&peer, payload).await {
            Ok(()) => {
                trace!(node = %self.node, peer = %peer, entries = entry_count, "pushed log tail");
                metrics::counter!("plexspaces_reception_gossip_rounds_total",
                    "node" => self.node.to_string())
                .increment(1);
            }
            Err(err) => {
                // unreachable peers are retried on the next cycle
                warn!(node = %self.node, peer = %peer, error = %err, "gossip push failed");
                metrics::counter!("plexspaces_reception_gossip_failures_total",
                    "node" => self.node.to_string())
                .increment(1);
            }
        }
    }
}
