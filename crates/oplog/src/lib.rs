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

//! # PlexSpaces Operation Log
//!
//! ## Purpose
//! The replicated data structure behind the receptionist: each node appends
//! register/remove operations to its own strictly-sequenced log, exchanges
//! log tails with peers, and replays everything it has seen into a
//! [`MergedView`] that converges across the cluster.
//!
//! ## Architecture Context
//! - **Causality**: per-origin sequence numbers, not wall clocks. A
//!   [`VersionVector`] summarizes how much of every origin's stream a node
//!   has observed; tails are exported relative to a peer's vector.
//! - **Conflict resolution**: within one origin the higher sequence number
//!   wins outright (log order is causal on a single node); across origins a
//!   remove permanently dominates a register for the same `(key, handle)`
//!   pair — termination is irreversible, registration is re-issuable.
//! - **Robustness**: duplicate deliveries are dropped without side effects;
//!   sequence gaps are dropped with a diagnostic and healed by the next
//!   gossip exchange.
//!
//! ## Key Components
//! - [`OpLogEntry`] / [`OpKind`]: one register/remove operation
//! - [`VersionVector`]: per-origin high-water marks
//! - [`OpLog`]: append-only store with tail export and compaction
//! - [`MergedView`]: incrementally maintained per-key handle sets

#![warn(missing_docs)]
#![warn(clippy::all)]

mod entry;
mod log;
mod version_vector;
mod view;

pub use entry::{OpKind, OpLogEntry};
pub use log::OpLog;
pub use version_vector::VersionVector;
pub use view::{Applied, MergedView};
