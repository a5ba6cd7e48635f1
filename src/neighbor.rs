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

//! The fixed set of neighbors and their link parameters.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use crate::types::{ConfigError, Relation};

/// One parsed neighbor descriptor of the form `port-ip-relation`, e.g. `7831-192.168.0.2-cust`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborConfig {
    /// The UDP port the neighbor listens on.
    pub port: u16,
    /// The neighbor's interface address on the shared link.
    pub addr: Ipv4Addr,
    /// The commercial relation towards the neighbor.
    pub relation: Relation,
}

impl std::str::FromStr for NeighborConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '-');
        let (Some(port), Some(addr), Some(relation)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ConfigError::MalformedDescriptor(s.to_string()));
        };
        Ok(Self {
            port: port
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.to_string()))?,
            addr: addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress(addr.to_string()))?,
            relation: relation.parse()?,
        })
    }
}

/// The neighbor registry. The set of neighbors is fixed at construction and never changes.
#[derive(Debug, Clone)]
pub struct NeighborTable {
    neighbors: BTreeMap<Ipv4Addr, NeighborConfig>,
}

impl NeighborTable {
    /// Build the registry from parsed descriptors. Fails if a neighbor address appears twice.
    pub fn new(configs: impl IntoIterator<Item = NeighborConfig>) -> Result<Self, ConfigError> {
        let mut neighbors = BTreeMap::new();
        for config in configs {
            let addr = config.addr;
            if neighbors.insert(addr, config).is_some() {
                return Err(ConfigError::DuplicateNeighbor(addr));
            }
        }
        Ok(Self { neighbors })
    }

    /// The relation towards the given neighbor.
    pub fn relation(&self, addr: Ipv4Addr) -> Option<Relation> {
        self.neighbors.get(&addr).map(|c| c.relation)
    }

    /// The UDP port of the given neighbor.
    pub fn port(&self, addr: Ipv4Addr) -> Option<u16> {
        self.neighbors.get(&addr).map(|c| c.port)
    }

    /// Whether `addr` is a declared neighbor.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.neighbors.contains_key(&addr)
    }

    /// All neighbor addresses, in address order.
    pub fn addrs(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.neighbors.keys().copied()
    }

    /// All neighbor configurations, in address order.
    pub fn iter(&self) -> impl Iterator<Item = &NeighborConfig> {
        self.neighbors.values()
    }

    /// The number of declared neighbors.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Whether no neighbor is declared.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// The router's own address on the link towards `neighbor`: the neighbor's address with the
    /// last octet replaced by 1.
    pub fn our_addr(neighbor: Ipv4Addr) -> Ipv4Addr {
        let [a, b, c, _] = neighbor.octets();
        Ipv4Addr::new(a, b, c, 1)
    }
}
