// pvrouter: a simplified inter-domain path-vector router
// Copyright 2024-2026 The pvrouter developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Module containing all type definitions

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod prefix;
pub use prefix::{Prefix, PrefixError};

/// AS Number
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Asn(pub u32);

impl std::fmt::Display for Asn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

impl From<u32> for Asn {
    fn from(x: u32) -> Self {
        Self(x)
    }
}

/// Commercial relationship towards a neighbor. The relation governs the valley-free export
/// policy: routes learned from a peer or a provider are re-advertised only to customers, while
/// routes learned from a customer are re-advertised to everyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// The neighbor pays us for transit (`cust`).
    Customer,
    /// Settlement-free peering (`peer`).
    Peer,
    /// We pay the neighbor for transit (`prov`).
    Provider,
}

impl Relation {
    /// Returns `true` if the relation is [`Relation::Customer`].
    pub fn is_customer(&self) -> bool {
        matches!(self, Self::Customer)
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::Customer => write!(f, "cust"),
            Relation::Peer => write!(f, "peer"),
            Relation::Provider => write!(f, "prov"),
        }
    }
}

impl std::str::FromStr for Relation {
    type Err = ParseRelationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cust" => Ok(Relation::Customer),
            "peer" => Ok(Relation::Peer),
            "prov" => Ok(Relation::Provider),
            _ => Err(ParseRelationError(s.to_string())),
        }
    }
}

/// Error returned when parsing a relation label
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("`{0}` is not a known relation (expected `cust`, `peer`, or `prov`)")]
pub struct ParseRelationError(pub String);

/// Construction errors. These are the only fatal errors: once a router is built, any malformed
/// input is logged and dropped instead.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The neighbor descriptor does not split into three `-`-separated parts.
    #[error("malformed neighbor descriptor `{0}`: expected `port-ip-relation`")]
    MalformedDescriptor(String),
    /// The port part of a descriptor is not a valid u16.
    #[error("invalid port `{0}` in neighbor descriptor")]
    InvalidPort(String),
    /// The address part of a descriptor is not a dotted quad.
    #[error("invalid neighbor address `{0}` in descriptor")]
    InvalidAddress(String),
    /// The relation part of a descriptor is not a known label.
    #[error("{0}")]
    UnknownRelation(#[from] ParseRelationError),
    /// The same neighbor address appears in two descriptors.
    #[error("neighbor {0} is declared twice")]
    DuplicateNeighbor(Ipv4Addr),
}
