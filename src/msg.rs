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

//! The JSON wire messages exchanged with neighbors.
//!
//! Every datagram carries one envelope `{"src": ..., "dst": ..., "type": ..., "msg": ...}`. The
//! dynamic `type`/`msg` pair of the protocol is parsed once at ingress into [`Body`], so every
//! later stage works with an explicit variant instead of an untyped mapping.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::bgp::{Origin, Route, RouteAttrs};
use crate::types::{Asn, Prefix};

/// The common envelope of every wire message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Source address of the message.
    pub src: Ipv4Addr,
    /// Destination address of the message.
    pub dst: Ipv4Addr,
    /// The tagged payload (`type` and `msg` on the wire).
    #[serde(flatten)]
    pub body: Body,
}

impl Envelope {
    /// Create a new envelope.
    pub fn new(src: Ipv4Addr, dst: Ipv4Addr, body: Body) -> Self {
        Self { src, dst, body }
    }

    /// Decode one datagram.
    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Encode into the bytes of one datagram.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// The `type`-tagged payload of a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "msg", rename_all = "snake_case")]
pub enum Body {
    /// Session-opening message, sent once to every neighbor at startup. Carries no payload and
    /// requires no action on receipt.
    Handshake(Empty),
    /// A route announcement.
    Update(RouteAttrs),
    /// Revocation of previously announced prefixes.
    Withdraw(Vec<Prefix>),
    /// A data packet to forward. The payload is opaque and passed through unchanged.
    Data(serde_json::Value),
    /// Request for a snapshot of the forwarding table.
    Dump(Empty),
    /// Reply to a `dump`.
    Table(Vec<TableEntry>),
    /// Reply to a `data` message for which no route exists.
    NoRoute(Empty),
    /// Any unrecognized `type`. Ignored.
    #[serde(other)]
    Unknown,
}

/// An empty `msg` payload (`{}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// One forwarding-table entry in a `table` reply. `peer` is the address of the neighbor the
/// route was learned from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    /// The covered prefix, flattened to `network`/`netmask` on the wire.
    #[serde(flatten)]
    pub prefix: Prefix,
    /// The neighbor the route was learned from.
    pub peer: Ipv4Addr,
    /// LOCAL-PREF
    #[serde(rename = "localpref")]
    pub local_pref: u32,
    /// AS path, most recent advertiser first.
    #[serde(rename = "ASPath")]
    pub as_path: Vec<Asn>,
    /// Whether the route was originated by the advertising router itself.
    #[serde(rename = "selfOrigin")]
    pub self_origin: bool,
    /// Origin code.
    pub origin: Origin,
}

impl From<&Route> for TableEntry {
    fn from(route: &Route) -> Self {
        Self {
            prefix: route.prefix,
            peer: route.learned_from,
            local_pref: route.local_pref,
            as_path: route.as_path.clone(),
            self_origin: route.self_origin,
            origin: route.origin,
        }
    }
}
