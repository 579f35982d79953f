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

//! # PlexSpaces Reception
//!
//! ## Purpose
//! Distributed service discovery for actor clusters: actors register under
//! typed keys, other actors look up or subscribe to the live set for a key,
//! and the set converges across cooperating nodes through an operation-log
//! registry exchanged by gossip — even as actors register, terminate or
//! become unreachable.
//!
//! ## Crate Map
//! - [`core`](plexspaces_reception_core): keys, handles, listings, config
//! - [`oplog`](plexspaces_oplog): operation log, version vectors, merge
//! - [`receptionist`](plexspaces_receptionist): the single-writer actor
//! - [`gossip`](plexspaces_gossip): periodic peer exchange
//!
//! ## Example
//! ```rust,no_run
//! use plexspaces_reception::{
//!     ActorHandle, LocalActorRuntime, NodeId, Receptionist, ReceptionistConfig, ServiceKey,
//! };
//! use std::sync::Arc;
//!
//! struct Ping;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let runtime = Arc::new(LocalActorRuntime::new());
//! let receptionist = Receptionist::spawn(
//!     NodeId::new("node-1"),
//!     ReceptionistConfig::default(),
//!     runtime.clone(),
//! );
//! runtime.attach(&receptionist).await;
//!
//! let key = ServiceKey::new::<Ping>("payments");
//! let worker = ActorHandle::new("worker-1", NodeId::new("node-1"));
//! receptionist.register(key.clone(), worker)?;
//!
//! let listing = receptionist.lookup(key).await?;
//! assert_eq!(listing.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use plexspaces_gossip::{
    ClusterMembership, GossipDriver, GossipError, GossipPayload, GossipTransport,
    InMemoryTransport, StaticMembership,
};
pub use plexspaces_oplog::{Applied, MergedView, OpKind, OpLog, OpLogEntry, VersionVector};
pub use plexspaces_reception_core::{
    ActorHandle, Listing, NodeId, ReceptionError, ReceptionistConfig, Registered, ServiceKey,
};
pub use plexspaces_receptionist::{
    ActorRuntime, LocalActorRuntime, ReceptionMessage, Receptionist, ReceptionistRef, TailExport,
};
