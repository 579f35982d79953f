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

//! Receptionist configuration
//!
//! ## Purpose
//! All operational tuning parameters in one place: flush batching window,
//! ask timeout, gossip cadence and log compaction. Nothing in the
//! receptionist hard-codes these values.

use std::time::Duration;

/// Operational tuning for a receptionist instance
#[derive(Clone, Debug)]
pub struct ReceptionistConfig {
    /// Batching window for listing notifications. Mutations to a key within
    /// one window coalesce into a single listing delivery.
    pub flush_delay: Duration,
    /// How long callers wait for a lookup or registration acknowledgment
    /// before the timeout is surfaced to them.
    pub ask_timeout: Duration,
    /// Interval between gossip rounds.
    pub gossip_interval: Duration,
    /// Retained log entries above which the fully-acknowledged prefix is
    /// compacted away.
    pub compaction_threshold: usize,
}

impl Default for ReceptionistConfig {
    fn default() -> Self {
        Self {
            flush_delay: Duration::from_millis(250),
            ask_timeout: Duration::from_secs(5),
            gossip_interval: Duration::from_secs(1),
            compaction_threshold: 10_000,
        }
    }
}

impl ReceptionistConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the flush batching window
    pub fn with_flush_delay(mut self, delay: Duration) -> Self {
        self.flush_delay = delay;
        self
    }

    /// Override the ask timeout
    pub fn with_ask_timeout(mut self, timeout: Duration) -> Self {
        self.ask_timeout = timeout;
        self
    }

    /// Override the gossip interval
    pub fn with_gossip_interval(mut self, interval: Duration) -> Self {
        self.gossip_interval = interval;
        self
    }

    /// Override the compaction threshold
    pub fn with_compaction_threshold(mut self, threshold: usize) -> Self {
        self.compaction_threshold = threshold;
        self
    }
}
