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

//! # PlexSpaces Reception Core
//!
//! ## Purpose
//! Key and identity model for the distributed receptionist: typed service
//! keys, opaque actor handles, listing snapshots, configuration and the
//! error taxonomy shared by the registry, replication and gossip crates.
//!
//! ## Architecture Context
//! Reception is the service-discovery subsystem of PlexSpaces: actors
//! register under a [`ServiceKey`], other actors look up or subscribe to the
//! live set of [`ActorHandle`]s for that key, and the set converges across
//! cluster nodes via an operation log exchanged by gossip.
//!
//! ## Key Components
//! - [`ServiceKey`]: typed discriminator grouping interchangeable actors
//! - [`ActorHandle`]: opaque, comparable reference to one actor incarnation
//! - [`Listing`]: immutable snapshot of the handles registered under a key
//! - [`ReceptionistConfig`]: operational tuning (flush delay, gossip cadence)
//! - [`ReceptionError`]: error taxonomy for all reception operations

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod identity;
mod key;
mod listing;

pub use config::ReceptionistConfig;
pub use error::ReceptionError;
pub use identity::{ActorHandle, NodeId};
pub use key::ServiceKey;
pub use listing::{Listing, Registered};
