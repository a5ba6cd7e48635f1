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

//! IPv4 prefixes with explicit dotted-quad netmasks.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An IPv4 prefix: a network address together with a left-contiguous netmask.
///
/// The inner network is always truncated, so `network & mask == network` holds by construction,
/// and the mask is left-contiguous because it is stored as a prefix length. On the wire a prefix
/// appears as a pair of dotted quads (`{"network": "a.b.c.d", "netmask": "a.b.c.d"}`), never as a
/// prefix length.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct Prefix(Ipv4Net);

impl Prefix {
    /// Create a prefix from a network address and a dotted-quad netmask. Host bits in `network`
    /// are cleared. Fails if the netmask is not left-contiguous.
    pub fn new(network: Ipv4Addr, netmask: Ipv4Addr) -> Result<Self, PrefixError> {
        Ipv4Net::with_netmask(network, netmask)
            .map(|net| Self(net.trunc()))
            .map_err(|_| PrefixError::InvalidNetmask(netmask))
    }

    /// Create a prefix from a network address and a prefix length. Host bits are cleared.
    pub fn from_len(network: Ipv4Addr, len: u8) -> Result<Self, PrefixError> {
        Ipv4Net::new(network, len)
            .map(|net| Self(net.trunc()))
            .map_err(|_| PrefixError::InvalidLength(len))
    }

    /// The network address (no host bits set).
    pub fn network(&self) -> Ipv4Addr {
        self.0.network()
    }

    /// The netmask in dotted-quad form.
    pub fn netmask(&self) -> Ipv4Addr {
        self.0.netmask()
    }

    /// The number of leading one-bits in the netmask.
    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    /// Returns `true` iff `addr & mask == network`.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.0.contains(&addr)
    }

    /// Returns `true` iff `self` and `other` have the same mask, agree on all masked bits above
    /// the last one, and differ exactly in the last masked bit. A `/0` prefix has no sibling; two
    /// distinct `/32` prefixes that differ only in their last bit are siblings.
    pub fn is_sibling_of(&self, other: &Prefix) -> bool {
        if self.0 == other.0 || self.0.prefix_len() != other.0.prefix_len() {
            return false;
        }
        match (self.0.supernet(), other.0.supernet()) {
            (Some(a), Some(b)) => a.trunc() == b.trunc(),
            _ => false,
        }
    }

    /// Merge two sibling prefixes into the prefix one bit shorter that covers both. The result
    /// carries the numerically lower network. Returns `None` if the prefixes are not siblings.
    pub fn aggregate(&self, other: &Prefix) -> Option<Prefix> {
        if self.is_sibling_of(other) {
            // supernet() only fails on /0, which has no sibling
            self.0.supernet().map(|net| Self(net.trunc()))
        } else {
            None
        }
    }
}

impl std::fmt::Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Prefix {
    type Err = PrefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv4Net>()
            .map(|net| Self(net.trunc()))
            .map_err(|_| PrefixError::InvalidPrefix(s.to_string()))
    }
}

/// Wire shape of a prefix.
#[derive(Serialize, Deserialize)]
struct PrefixParts {
    network: Ipv4Addr,
    netmask: Ipv4Addr,
}

impl Serialize for Prefix {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PrefixParts {
            network: self.network(),
            netmask: self.netmask(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Prefix {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = PrefixParts::deserialize(deserializer)?;
        Prefix::new(parts.network, parts.netmask).map_err(serde::de::Error::custom)
    }
}

/// Error returned when constructing a prefix
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PrefixError {
    /// The netmask is not of the form 1-bits followed by 0-bits.
    #[error("netmask {0} is not left-contiguous")]
    InvalidNetmask(Ipv4Addr),
    /// The prefix length exceeds 32.
    #[error("invalid prefix length {0}")]
    InvalidLength(u8),
    /// The string is not of the form `a.b.c.d/len`.
    #[error("`{0}` is not a valid prefix")]
    InvalidPrefix(String),
}
