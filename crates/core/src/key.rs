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

//! Typed service keys
//!
//! ## Purpose
//! A [`ServiceKey`] groups interchangeable actors under a `(type, id)` pair.
//! The type component keeps lookups honest: a `ServiceKey::new::<PingMsg>("svc")`
//! and a `ServiceKey::new::<OtherMsg>("svc")` are distinct keys, so a caller
//! can only discover actors speaking the protocol it expects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed discriminator grouping interchangeable actors
///
/// Equality and hashing cover both the type tag and the id. Keys are
/// immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ServiceKey {
    /// Fully qualified name of the message type the actors speak
    type_name: String,
    /// Logical service id within that type (e.g. `"payments"`)
    id: String,
}

impl ServiceKey {
    /// Create a key for actors speaking message type `M`
    pub fn new<M: 'static>(id: impl Into<String>) -> Self {
        Self {
            type_name: std::any::type_name::<M>().to_string(),
            id: id.into(),
        }
    }

    /// Reconstruct a key from raw parts (wire round-trips)
    pub fn raw(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
        }
    }

    /// The type tag component
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The id component
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.id, self.type_name)
    }
}
