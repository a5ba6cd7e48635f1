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

//! The router core: classifies inbound messages and turns them into table mutations and
//! outbound messages.
//!
//! The router owns the forwarding table and the announcement log exclusively. It performs no
//! I/O: it consumes decoded messages tagged with the neighbor interface they arrived on and
//! returns the messages to send, addressed by neighbor. The event loop in [`crate::network`]
//! drives it one datagram at a time, so updates and withdrawals from a neighbor are processed
//! in arrival order.

use std::net::Ipv4Addr;

use crate::bgp::{Route, RouteAttrs};
use crate::msg::{Body, Empty, Envelope, TableEntry};
use crate::neighbor::{NeighborConfig, NeighborTable};
use crate::policy;
use crate::rib::{Rib, RibLog};
use crate::types::{Asn, ConfigError, Prefix};

/// Messages to be sent out, each addressed to a declared neighbor.
pub type Outbound = Vec<(Ipv4Addr, Envelope)>;

/// A path-vector router with a fixed set of neighbors.
#[derive(Debug)]
pub struct Router {
    asn: Asn,
    neighbors: NeighborTable,
    rib: Rib,
    log: RibLog,
}

impl Router {
    /// Build a router from its AS number and the parsed neighbor descriptors. Fails on
    /// duplicate neighbors; this is the only fatal error path.
    pub fn new(
        asn: Asn,
        configs: impl IntoIterator<Item = NeighborConfig>,
    ) -> Result<Self, ConfigError> {
        let neighbors = NeighborTable::new(configs)?;
        let rib = Rib::new(neighbors.addrs());
        let log = RibLog::new(neighbors.addrs());
        Ok(Self {
            asn,
            neighbors,
            rib,
            log,
        })
    }

    /*
     * Getter Functions
     */

    /// The router's AS number.
    pub fn asn(&self) -> Asn {
        self.asn
    }

    /// The neighbor registry.
    pub fn neighbors(&self) -> &NeighborTable {
        &self.neighbors
    }

    /// The current forwarding table.
    pub fn rib(&self) -> &Rib {
        &self.rib
    }

    /*
     * Message Processing
     */

    /// The handshakes to send once at startup, one per neighbor.
    pub fn startup_messages(&self) -> Outbound {
        self.neighbors
            .addrs()
            .map(|n| {
                let body = Body::Handshake(Empty {});
                (n, Envelope::new(NeighborTable::our_addr(n), n, body))
            })
            .collect()
    }

    /// Process one decoded message received on the interface towards `srcif`, and return the
    /// messages to send in response. Dispatching runs to completion; no partial state is ever
    /// observable between two calls.
    pub fn handle_message(&mut self, srcif: Ipv4Addr, msg: Envelope) -> Outbound {
        if !self.neighbors.contains(srcif) {
            log::warn!("received a message on undeclared interface {srcif}; ignoring");
            return Vec::new();
        }
        match msg.body {
            Body::Handshake(_) => {
                log::trace!("handshake from {srcif}");
                Vec::new()
            }
            Body::Update(attrs) => self.handle_update(srcif, attrs),
            Body::Withdraw(prefixes) => self.handle_withdraw(srcif, prefixes),
            Body::Data(payload) => self.handle_data(srcif, msg.src, msg.dst, payload),
            Body::Dump(_) => self.handle_dump(srcif, msg.src),
            Body::Table(_) | Body::NoRoute(_) => {
                log::debug!("unsolicited reply message from {srcif}; ignoring");
                Vec::new()
            }
            Body::Unknown => Vec::new(),
        }
    }

    /// Record the announcement, install the route, and re-advertise it with our ASN prepended.
    fn handle_update(&mut self, srcif: Ipv4Addr, attrs: RouteAttrs) -> Outbound {
        log::debug!("update from {srcif}: {}", attrs.prefix);
        self.log.record_announcement(srcif, attrs.clone());
        self.rib
            .insert(srcif, Route::from_attrs(attrs.clone(), srcif));
        self.propagate(srcif, Body::Update(attrs.prepend(self.asn)))
    }

    /// Remove the listed prefixes, falling back to a rebuild from the log when any of them is no
    /// longer stored in its announced shape, then pass the withdrawal on unchanged.
    fn handle_withdraw(&mut self, srcif: Ipv4Addr, prefixes: Vec<Prefix>) -> Outbound {
        self.log.record_revocations(srcif, &prefixes);
        let mut all_removed = true;
        for prefix in &prefixes {
            let removed = self.rib.remove_exact(srcif, *prefix);
            log::debug!(
                "withdraw {prefix} from {srcif}: {}",
                if removed { "removed" } else { "no exact match" }
            );
            all_removed &= removed;
        }
        if !all_removed {
            self.rib.rebuild(
                srcif,
                self.log.announcements(srcif),
                self.log.revocations(srcif),
            );
        }
        self.propagate(srcif, Body::Withdraw(prefixes))
    }

    /// Forward a data packet along the best route, if one exists and the customer-or-customer
    /// rule permits it. Without a route, the sender is notified; on a policy violation the
    /// packet vanishes silently.
    fn handle_data(
        &self,
        srcif: Ipv4Addr,
        src: Ipv4Addr,
        dst: Ipv4Addr,
        payload: serde_json::Value,
    ) -> Outbound {
        let Some(next_hop) = self.rib.best_route(dst) else {
            log::debug!("no route towards {dst}; notifying {src}");
            let body = Body::NoRoute(Empty {});
            return vec![(srcif, Envelope::new(NeighborTable::our_addr(srcif), src, body))];
        };
        let (Some(from_rel), Some(to_rel)) = (
            self.neighbors.relation(srcif),
            self.neighbors.relation(next_hop),
        ) else {
            return Vec::new();
        };
        if policy::may_forward_data(from_rel, to_rel) {
            vec![(next_hop, Envelope::new(src, dst, Body::Data(payload)))]
        } else {
            log::debug!("dropping data from {srcif} towards {next_hop}: no customer involved");
            Vec::new()
        }
    }

    /// Reply with a snapshot of the full forwarding table.
    fn handle_dump(&self, srcif: Ipv4Addr, src: Ipv4Addr) -> Outbound {
        let entries: Vec<TableEntry> = self.rib.iter().map(|(_, route)| route.into()).collect();
        let body = Body::Table(entries);
        vec![(srcif, Envelope::new(NeighborTable::our_addr(srcif), src, body))]
    }

    /// Address a copy of `body` to every neighbor the export policy selects, rewriting the
    /// envelope for each target link.
    fn propagate(&self, from: Ipv4Addr, body: Body) -> Outbound {
        let Some(from_rel) = self.neighbors.relation(from) else {
            return Vec::new();
        };
        self.neighbors
            .iter()
            .filter(|config| policy::should_export(from, from_rel, config.addr, config.relation))
            .map(|config| {
                let our_addr = NeighborTable::our_addr(config.addr);
                (
                    config.addr,
                    Envelope::new(our_addr, config.addr, body.clone()),
                )
            })
            .collect()
    }
}
