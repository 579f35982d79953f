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

//! # PlexSpaces Receptionist
//!
//! ## Purpose
//! The single-writer service-discovery actor: processes register, remove,
//! lookup, subscribe and replication messages one at a time through one
//! mailbox, keeps the merged view and operation log consistent, batches
//! listing notifications through a delayed flush, and removes handles
//! automatically when the actor runtime reports their termination.
//!
//! ## Concurrency Model
//! One logical thread of control per instance: every operation — including
//! flush-timer firings, which are self-addressed messages — is serialized
//! through the mailbox, so no internal locking exists and replication is
//! observationally indistinguishable from local mutation.
//!
//! ## Key Components
//! - [`Receptionist`]: the actor; spawn with [`Receptionist::spawn`]
//! - [`ReceptionistRef`]: cheap-clone handle with the tell/ask API
//! - [`ReceptionMessage`]: the tagged-variant message surface
//! - [`ActorRuntime`]: collaborator capability (listing delivery, watches)
//! - [`LocalActorRuntime`]: in-process runtime for tests and single-process
//!   systems

#![warn(missing_docs)]
#![warn(clippy::all)]

mod messages;
mod reception_ref;
mod receptionist;
mod runtime;

pub use messages::{ReceptionMessage, TailExport};
pub use reception_ref::ReceptionistRef;
pub use receptionist::Receptionist;
pub use runtime::{ActorRuntime, LocalActorRuntime};
