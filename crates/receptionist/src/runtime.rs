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

//! Actor runtime collaborator interface
//!
//! ## Purpose
//! The receptionist does not own actors and does not deliver messages
//! itself; it relies on the hosting actor runtime for exactly two
//! capabilities: delivering a [`Listing`] to a subscriber, and watching a
//! handle so that its termination comes back — exactly once — as a
//! [`ReceptionMessage::Terminated`] into the receptionist's own queue.
//!
//! [`LocalActorRuntime`] implements the seam in-process: an inbox directory
//! for listing delivery plus a watch registry, the same shape the PlexSpaces
//! actor registry uses for monitor links.

use crate::{ReceptionMessage, ReceptionistRef};
use async_trait::async_trait;
use plexspaces_reception_core::{ActorHandle, Listing, ReceptionError};
use std::collections::{HashMap, HashSet};
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

/// Capabilities the receptionist needs from the hosting actor runtime
#[async_trait]
pub trait ActorRuntime: Send + Sync {
    /// Deliver a listing snapshot to a subscriber's mailbox
    async fn send_listing(
        &self,
        subscriber: &ActorHandle,
        listing: Listing,
    ) -> Result<(), ReceptionError>;

    /// Ask to be notified exactly once when `handle` becomes unreachable.
    /// Watching the same handle again is a no-op.
    async fn watch(&self, handle: &ActorHandle);
}

/// In-process actor runtime for tests and single-process systems
///
/// ## Usage
/// ```rust,ignore
/// let runtime = Arc::new(LocalActorRuntime::new());
/// let receptionist = Receptionist::spawn(node, config, runtime.clone());
/// runtime.attach(&receptionist).await;
///
/// let mut inbox = runtime.register_inbox(subscriber.clone()).await;
/// // ... later, simulate the actor stopping:
/// runtime.terminate(&subscriber).await;
/// ```
#[derive(Default)]
pub struct LocalActorRuntime {
    /// Listing inboxes per handle
    inboxes: RwLock<HashMap<ActorHandle, mpsc::UnboundedSender<Listing>>>,
    /// Handles under termination watch
    watched: RwLock<HashSet<ActorHandle>>,
    /// Receptionist to notify on termination
    receptionist: RwLock<Option<ReceptionistRef>>,
}

impl LocalActorRuntime {
    /// Create an empty runtime
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire termination notifications into a receptionist's queue
    pub async fn attach(&self, receptionist: &ReceptionistRef) {
        *self.receptionist.write().await = Some(receptionist.clone());
    }

    /// Create a listing inbox for `handle` and return its receiving end
    pub async fn register_inbox(&self, handle: ActorHandle) -> mpsc::UnboundedReceiver<Listing> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inboxes.write().await.insert(handle, tx);
        rx
    }

    /// Simulate `handle` terminating: drop its inbox and, if it was
    /// watched, deliver exactly one termination notification.
    pub async fn terminate(&self, handle: &ActorHandle) {
        self.inboxes.write().await.remove(handle);
        let was_watched = self.watched.write().await.remove(handle);
        if !was_watched {
            return;
        }
        if let Some(receptionist) = self.receptionist.read().await.clone() {
            let _ = receptionist.tell(ReceptionMessage::Terminated {
                handle: handle.clone(),
            });
        }
    }

    /// True when `handle` is currently under watch
    pub async fn is_watched(&self, handle: &ActorHandle) -> bool {
        self.watched.read().await.contains(handle)
    }
}

#[async_trait]
impl ActorRuntime for LocalActorRuntime {
    async fn send_listing(
        &self,
        subscriber: &ActorHandle,
        listing: Listing,
    ) -> Result<(), ReceptionError> {
        let inboxes = self.inboxes.read().await;
        match inboxes.get(subscriber) {
            Some(tx) if tx.send(listing).is_ok() => Ok(()),
            _ => {
                debug!(subscriber = %subscriber, "listing dropped, subscriber inbox gone");
                Err(ReceptionError::Unavailable(format!(
                    "no inbox for {}",
                    subscriber
                )))
            }
        }
    }

    async fn watch(&self, handle: &ActorHandle) {
        self.watched.write().await.insert(handle.clone());
    }
}
