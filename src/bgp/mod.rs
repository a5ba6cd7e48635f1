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

//! Module containing definitions for the path-vector routes exchanged with neighbors.

use std::cmp::Ordering;
use std::net::Ipv4Addr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::types::{Asn, Prefix};

/// Origin code of a route. Ranked `Igp > Egp > Unk` for route selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Origin {
    /// The route originated inside the advertising AS.
    Igp,
    /// The route was learned via an exterior protocol.
    Egp,
    /// The origin is unknown.
    Unk,
}

impl Origin {
    fn rank(&self) -> u8 {
        match self {
            Origin::Igp => 2,
            Origin::Egp => 1,
            Origin::Unk => 0,
        }
    }
}

impl Ord for Origin {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Origin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Igp => write!(f, "IGP"),
            Origin::Egp => write!(f, "EGP"),
            Origin::Unk => write!(f, "UNK"),
        }
    }
}

/// The path attributes carried by a route announcement. This is the `msg` payload of an `update`
/// message, and the record stored verbatim in the announcement log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAttrs {
    /// The announced prefix, flattened to `network`/`netmask` on the wire.
    #[serde(flatten)]
    pub prefix: Prefix,
    /// LOCAL-PREF
    #[serde(rename = "localpref")]
    pub local_pref: u32,
    /// Whether the route was originated by the advertising router itself.
    #[serde(rename = "selfOrigin")]
    pub self_origin: bool,
    /// AS path, with the most recent advertiser at index 0.
    #[serde(rename = "ASPath")]
    pub as_path: Vec<Asn>,
    /// Origin code.
    pub origin: Origin,
}

impl RouteAttrs {
    /// Return a copy of these attributes with `asn` prepended to the AS path, as performed on
    /// every re-advertisement.
    pub fn prepend(&self, asn: Asn) -> Self {
        let mut attrs = self.clone();
        attrs.as_path.insert(0, asn);
        attrs
    }
}

/// A forwarding-table entry: announced path attributes together with the neighbor the route was
/// learned from. Entries are immutable; aggregation replaces a group of entries with a fresh,
/// coarser one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// The covered prefix. Coarser than originally announced once aggregated.
    pub prefix: Prefix,
    /// LOCAL-PREF
    pub local_pref: u32,
    /// Whether the route was originated by the advertising router itself.
    pub self_origin: bool,
    /// AS path, most recent advertiser first.
    pub as_path: Vec<Asn>,
    /// Origin code.
    pub origin: Origin,
    /// Interface address of the neighbor that announced the route.
    pub learned_from: Ipv4Addr,
}

impl Route {
    /// Build a table entry from announced attributes and the announcing neighbor.
    pub fn from_attrs(attrs: RouteAttrs, learned_from: Ipv4Addr) -> Self {
        Self {
            prefix: attrs.prefix,
            local_pref: attrs.local_pref,
            self_origin: attrs.self_origin,
            as_path: attrs.as_path,
            origin: attrs.origin,
            learned_from,
        }
    }

    /// Structural equality over everything except the network address: mask, LOCAL-PREF,
    /// self-origin, AS path, origin, and learning neighbor. Two sibling entries may only be
    /// aggregated when this holds.
    pub fn same_attributes(&self, other: &Self) -> bool {
        self.prefix.netmask() == other.prefix.netmask()
            && self.local_pref == other.local_pref
            && self.self_origin == other.self_origin
            && self.as_path == other.as_path
            && self.origin == other.origin
            && self.learned_from == other.learned_from
    }

    /// The route-selection ladder, applied among entries whose prefix contains the destination.
    /// `Ordering::Greater` means `self` is preferred. Each step only breaks ties left by the
    /// previous one:
    ///
    /// 1. longest prefix,
    /// 2. highest LOCAL-PREF,
    /// 3. self-originated routes,
    /// 4. shortest AS path,
    /// 5. best origin (`IGP > EGP > UNK`),
    /// 6. numerically lowest neighbor address.
    pub fn compare(&self, other: &Self) -> Ordering {
        match self.prefix.prefix_len().cmp(&other.prefix.prefix_len()) {
            Ordering::Equal => {}
            o => return o,
        }

        match self.local_pref.cmp(&other.local_pref) {
            Ordering::Equal => {}
            o => return o,
        }

        match (self.self_origin, other.self_origin) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }

        match self.as_path.len().cmp(&other.as_path.len()) {
            Ordering::Equal => {}
            Ordering::Greater => return Ordering::Less,
            Ordering::Less => return Ordering::Greater,
        }

        match self.origin.cmp(&other.origin) {
            Ordering::Equal => {}
            o => return o,
        }

        match self.learned_from.cmp(&other.learned_from) {
            Ordering::Equal => Ordering::Equal,
            Ordering::Greater => Ordering::Less,
            Ordering::Less => Ordering::Greater,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} via {} [localpref {}, path {}, {}{}]",
            self.prefix,
            self.learned_from,
            self.local_pref,
            self.as_path.iter().map(|asn| asn.0).join(" "),
            self.origin,
            if self.self_origin { ", self" } else { "" },
        )
    }
}
