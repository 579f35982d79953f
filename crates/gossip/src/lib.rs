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

//! # PlexSpaces Reception Gossip
//!
//! ## Purpose
//! Drives eventual convergence of receptionist registries: a periodic task
//! picks one peer per round, asks the local receptionist which log suffix
//! that peer is missing, and pushes it. Inbound tails land in the
//! receptionist's queue like any other message.
//!
//! ## Architecture Context
//! Membership (who the peers are, failure detection) and the wire transport
//! are external collaborators behind the [`ClusterMembership`] and
//! [`GossipTransport`] seams. An unreachable peer is logged and skipped;
//! the next cycle simply retries — nothing here escalates.
//!
//! ## Key Components
//! - [`GossipDriver`]: the periodic exchange task
//! - [`GossipPayload`]: the serde-encodable wire message
//! - [`InMemoryTransport`] / [`StaticMembership`]: in-process collaborators
//!   for tests and single-process clusters

#![warn(missing_docs)]
#![warn(clippy::all)]

mod driver;
mod in_memory;
mod payload;
mod traits;

pub use driver::GossipDriver;
pub use in_memory::InMemoryTransport;
pub use payload::GossipPayload;
pub use traits::{ClusterMembership, GossipError, GossipTransport, StaticMembership};
