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

//! Error taxonomy for reception operations
//!
//! Nothing in the receptionist is fatal to the hosting process: malformed
//! log entries are dropped with a diagnostic, unknown handles are no-ops,
//! and unreachable peers are retried on the next gossip cycle. The variants
//! here cover what *is* surfaced to callers.

use std::time::Duration;
use thiserror::Error;

/// Error types for receptionist operations
#[derive(Debug, Error)]
pub enum ReceptionError {
    /// The caller's lookup or acknowledgment wait exceeded its deadline.
    /// Retrying is the caller's responsibility.
    #[error("timed out after {0:?} waiting for receptionist reply")]
    AskTimeout(Duration),

    /// The receptionist's mailbox is closed (instance stopped)
    #[error("receptionist unavailable: {0}")]
    Unavailable(String),

    /// Malformed or out-of-causal-order replication input, dropped with a
    /// diagnostic and healed by a later gossip exchange
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// Peer send failure during gossip; the driver skips the peer and
    /// retries on the next cycle
    #[error("transport error: {0}")]
    Transport(String),
}
