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

//! The valley-free policy derived from commercial relations.
//!
//! Announcements learned from a customer are flooded to every other neighbor; announcements
//! learned from a peer or a provider reach only customers. The same customer-or-customer rule
//! applies to data packets: a packet is carried only when it enters from a customer or leaves
//! towards one.

use std::net::Ipv4Addr;

use crate::types::Relation;

/// Returns whether an update or withdrawal learned from `from` is re-advertised to `to`.
#[inline(always)]
pub fn should_export(from: Ipv4Addr, from_rel: Relation, to: Ipv4Addr, to_rel: Relation) -> bool {
    // never advertise a route back to its sender
    if from == to {
        return false;
    }

    matches!(
        (from_rel, to_rel),
        (Relation::Customer, _) | (_, Relation::Customer)
    )
}

/// Returns whether a data packet arriving from a neighbor with relation `from_rel` may be
/// forwarded towards the next-hop neighbor with relation `to_rel`. A `false` result means the
/// packet is dropped silently, with no reply to the sender.
#[inline(always)]
pub fn may_forward_data(from_rel: Relation, to_rel: Relation) -> bool {
    from_rel.is_customer() || to_rel.is_customer()
}
