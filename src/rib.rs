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

//! The routing information base: the forwarding table and the announcement log.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use itertools::Itertools;

use crate::bgp::{Route, RouteAttrs};
use crate::types::Prefix;

/// The forwarding table: for every neighbor, the routes learned from it.
///
/// Invariants: every entry stored under a neighbor was learned from that neighbor, and no two
/// entries under the same neighbor carry the same prefix (a re-announcement replaces the old
/// entry). Sibling entries with equal attributes are merged into one entry with a one-bit
/// shorter mask; merging repeats until no pair qualifies, so the merged entry may itself be
/// aggregated further.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rib {
    table: BTreeMap<Ipv4Addr, Vec<Route>>,
}

impl Rib {
    /// Create an empty table with one (empty) bucket per declared neighbor.
    pub fn new(neighbors: impl IntoIterator<Item = Ipv4Addr>) -> Self {
        Self {
            table: neighbors.into_iter().map(|n| (n, Vec::new())).collect(),
        }
    }

    /// Insert a route under `neighbor`, replacing any entry with the same prefix, then aggregate
    /// the neighbor's entries to a fixpoint.
    pub fn insert(&mut self, neighbor: Ipv4Addr, route: Route) {
        debug_assert_eq!(route.learned_from, neighbor);
        self.insert_unaggregated(neighbor, route);
        self.aggregate(neighbor);
    }

    /// Insert without the aggregation pass. Used when replaying the announcement log, where
    /// aggregation must wait until the revocations have been applied.
    fn insert_unaggregated(&mut self, neighbor: Ipv4Addr, route: Route) {
        let entries = self.table.entry(neighbor).or_default();
        if let Some(existing) = entries.iter_mut().find(|e| e.prefix == route.prefix) {
            *existing = route;
        } else {
            entries.push(route);
        }
    }

    /// Remove the entry under `neighbor` whose prefix is exactly `prefix`. Returns whether such
    /// an entry existed. This only succeeds while the prefix is still stored in its announced
    /// shape; once aggregation has merged it into a coarser entry, the caller must fall back to
    /// [`Rib::rebuild`].
    pub fn remove_exact(&mut self, neighbor: Ipv4Addr, prefix: Prefix) -> bool {
        let Some(entries) = self.table.get_mut(&neighbor) else {
            return false;
        };
        match entries.iter().position(|e| e.prefix == prefix) {
            Some(pos) => {
                entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Discard everything learned from `neighbor` and reconstruct it from the announcement log:
    /// replay every announcement (same-prefix replacement applies), remove every revoked prefix
    /// by exact match, then aggregate. Aggregation must not run during the replay: a merge could
    /// swallow a prefix that a later revocation still needs to match exactly.
    pub fn rebuild(
        &mut self,
        neighbor: Ipv4Addr,
        announcements: &[RouteAttrs],
        revocations: &[Prefix],
    ) {
        log::debug!(
            "rebuild table for {neighbor}: {} announcements, {} revocations",
            announcements.len(),
            revocations.len()
        );
        if let Some(entries) = self.table.get_mut(&neighbor) {
            entries.clear();
        }
        for attrs in announcements {
            self.insert_unaggregated(neighbor, Route::from_attrs(attrs.clone(), neighbor));
        }
        for prefix in revocations {
            self.remove_exact(neighbor, *prefix);
        }
        self.aggregate(neighbor);
    }

    /// The neighbor through which `dst` should be forwarded, or `None` if no entry contains
    /// `dst`. Candidates are compared with the selection ladder; the first-encountered entry
    /// wins any remaining tie, and neighbors are scanned in address order, so the result is
    /// deterministic.
    pub fn best_route(&self, dst: Ipv4Addr) -> Option<Ipv4Addr> {
        let mut best: Option<&Route> = None;
        for route in self.table.values().flatten() {
            if !route.prefix.contains(dst) {
                continue;
            }
            match best {
                Some(current) if route.compare(current) != Ordering::Greater => {}
                _ => best = Some(route),
            }
        }
        best.map(|route| route.learned_from)
    }

    /// Iterate over all `(neighbor, route)` pairs, neighbors in address order.
    pub fn iter(&self) -> impl Iterator<Item = (Ipv4Addr, &Route)> {
        self.table
            .iter()
            .flat_map(|(neighbor, entries)| entries.iter().map(move |e| (*neighbor, e)))
    }

    /// The routes currently stored under `neighbor`.
    pub fn entries(&self, neighbor: Ipv4Addr) -> &[Route] {
        self.table.get(&neighbor).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of entries across all neighbors.
    pub fn len(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    /// Whether the table holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.table.values().all(Vec::is_empty)
    }

    /// Merge sibling entries with equal attributes under `neighbor` until no pair qualifies.
    /// Each applied merge restarts the scan, since the merged entry may pair up again.
    fn aggregate(&mut self, neighbor: Ipv4Addr) {
        let Some(entries) = self.table.get_mut(&neighbor) else {
            return;
        };
        loop {
            let candidate = (0..entries.len())
                .tuple_combinations()
                .find_map(|(i, j)| {
                    if !entries[i].same_attributes(&entries[j]) {
                        return None;
                    }
                    entries[i]
                        .prefix
                        .aggregate(&entries[j].prefix)
                        .map(|merged| (i, j, merged))
                });
            let Some((i, j, merged)) = candidate else {
                break;
            };
            // j > i, so removing j leaves i in place
            let removed = entries.swap_remove(j);
            let kept = entries[i].clone();
            log::debug!(
                "aggregate {} and {} from {neighbor} into {merged}",
                kept.prefix,
                removed.prefix
            );
            entries[i] = Route {
                prefix: merged,
                ..kept
            };
        }
    }
}

/// The append-only history of announcements and revocations, recorded per neighbor in arrival
/// order and before any aggregation. Only consulted to rebuild the forwarding table after a
/// withdrawal that exact-match removal cannot satisfy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RibLog {
    announcements: BTreeMap<Ipv4Addr, Vec<RouteAttrs>>,
    revocations: BTreeMap<Ipv4Addr, Vec<Prefix>>,
}

impl RibLog {
    /// Create an empty log for the declared neighbors.
    pub fn new(neighbors: impl IntoIterator<Item = Ipv4Addr>) -> Self {
        let mut log = Self::default();
        for neighbor in neighbors {
            log.announcements.insert(neighbor, Vec::new());
            log.revocations.insert(neighbor, Vec::new());
        }
        log
    }

    /// Record an announcement exactly as received.
    pub fn record_announcement(&mut self, neighbor: Ipv4Addr, attrs: RouteAttrs) {
        self.announcements.entry(neighbor).or_default().push(attrs);
    }

    /// Record the prefixes listed in a withdrawal, in message order.
    pub fn record_revocations(&mut self, neighbor: Ipv4Addr, prefixes: &[Prefix]) {
        self.revocations
            .entry(neighbor)
            .or_default()
            .extend_from_slice(prefixes);
    }

    /// All announcements received from `neighbor`, oldest first.
    pub fn announcements(&self, neighbor: Ipv4Addr) -> &[RouteAttrs] {
        self.announcements
            .get(&neighbor)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All revocations received from `neighbor`, oldest first.
    pub fn revocations(&self, neighbor: Ipv4Addr) -> &[Prefix] {
        self.revocations
            .get(&neighbor)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
