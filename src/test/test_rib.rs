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

use std::net::Ipv4Addr;

use pretty_assertions::assert_eq;

use crate::bgp::{Origin, Route, RouteAttrs};
use crate::rib::Rib;
use crate::types::{Asn, Prefix};

const A: &str = "172.16.0.2";
const B: &str = "172.17.0.2";

fn ip(s: &str) -> Ipv4Addr {
    s.parse().unwrap()
}

fn prefix(s: &str) -> Prefix {
    s.parse().unwrap()
}

fn attrs(p: &str) -> RouteAttrs {
    RouteAttrs {
        prefix: prefix(p),
        local_pref: 100,
        self_origin: false,
        as_path: vec![Asn(2), Asn(3)],
        origin: Origin::Igp,
    }
}

fn route(p: &str, neighbor: &str) -> Route {
    Route::from_attrs(attrs(p), ip(neighbor))
}

fn rib_for(neighbors: &[&str]) -> Rib {
    Rib::new(neighbors.iter().map(|n| ip(n)))
}

#[test]
fn aggregation_merges_siblings() {
    let mut rib = rib_for(&[A]);
    rib.insert(ip(A), route("192.0.0.0/24", A));
    rib.insert(ip(A), route("192.0.1.0/24", A));

    assert_eq!(rib.entries(ip(A)), &[route("192.0.0.0/23", A)]);
}

#[test]
fn aggregation_blocked_by_attribute_mismatch() {
    let mut rib = rib_for(&[A]);
    rib.insert(ip(A), route("192.0.0.0/24", A));
    rib.insert(
        ip(A),
        Route {
            local_pref: 200,
            ..route("192.0.1.0/24", A)
        },
    );

    assert_eq!(rib.entries(ip(A)).len(), 2);
}

#[test]
fn aggregation_does_not_cross_neighbors() {
    let mut rib = rib_for(&[A, B]);
    rib.insert(ip(A), route("192.0.0.0/24", A));
    rib.insert(ip(B), route("192.0.1.0/24", B));

    assert_eq!(rib.len(), 2);
}

#[test]
fn aggregation_runs_to_fixpoint() {
    // four sibling /24s collapse into a single /22, the merged /23s pairing up in turn
    let mut rib = rib_for(&[A]);
    for p in ["192.0.0.0/24", "192.0.1.0/24", "192.0.2.0/24", "192.0.3.0/24"] {
        rib.insert(ip(A), route(p, A));
    }

    assert_eq!(rib.entries(ip(A)), &[route("192.0.0.0/22", A)]);
}

#[test]
fn reannouncement_replaces_same_prefix() {
    let mut rib = rib_for(&[A]);
    rib.insert(ip(A), route("10.0.0.0/8", A));
    rib.insert(
        ip(A),
        Route {
            local_pref: 200,
            ..route("10.0.0.0/8", A)
        },
    );

    assert_eq!(rib.entries(ip(A)).len(), 1);
    assert_eq!(rib.entries(ip(A))[0].local_pref, 200);
}

#[test]
fn remove_exact_only_matches_announced_shape() {
    let mut rib = rib_for(&[A]);
    rib.insert(ip(A), route("192.0.0.0/24", A));
    rib.insert(ip(A), route("192.0.1.0/24", A));

    // the /24s no longer exist in their announced shape
    assert!(!rib.remove_exact(ip(A), prefix("192.0.0.0/24")));
    assert!(rib.remove_exact(ip(A), prefix("192.0.0.0/23")));
    assert!(rib.entries(ip(A)).is_empty());
}

#[test]
fn rebuild_after_aggregation() {
    let mut rib = rib_for(&[A]);
    rib.insert(ip(A), route("192.0.0.0/24", A));
    rib.insert(ip(A), route("192.0.1.0/24", A));
    assert_eq!(rib.entries(ip(A)).len(), 1);

    let announcements = vec![attrs("192.0.0.0/24"), attrs("192.0.1.0/24")];
    let revocations = vec![prefix("192.0.0.0/24")];
    rib.rebuild(ip(A), &announcements, &revocations);

    assert_eq!(rib.entries(ip(A)), &[route("192.0.1.0/24", A)]);
}

#[test]
fn rebuild_matches_incremental_path() {
    let announcements = vec![
        attrs("192.0.0.0/24"),
        attrs("192.0.1.0/24"),
        attrs("10.0.0.0/8"),
    ];

    let mut incremental = rib_for(&[A]);
    for a in &announcements {
        incremental.insert(ip(A), Route::from_attrs(a.clone(), ip(A)));
    }

    let mut rebuilt = rib_for(&[A]);
    rebuilt.rebuild(ip(A), &announcements, &[]);
    assert_eq!(incremental, rebuilt);

    // aggregation is idempotent: rebuilding again changes nothing
    rebuilt.rebuild(ip(A), &announcements, &[]);
    assert_eq!(incremental, rebuilt);
}

#[test]
fn coverage_after_rebuild() {
    let mut rib = rib_for(&[A]);
    rib.insert(ip(A), route("192.0.0.0/24", A));
    rib.insert(ip(A), route("192.0.1.0/24", A));

    let announcements = vec![attrs("192.0.0.0/24"), attrs("192.0.1.0/24")];
    let revocations = vec![prefix("192.0.0.0/24")];
    rib.rebuild(ip(A), &announcements, &revocations);

    // the revoked half is uncovered, the other half still routes
    assert_eq!(rib.best_route(ip("192.0.0.17")), None);
    assert_eq!(rib.best_route(ip("192.0.1.17")), Some(ip(A)));
}

#[test]
fn best_route_longest_prefix_wins() {
    let mut rib = rib_for(&[A, B]);
    rib.insert(ip(A), route("10.0.0.0/8", A));
    rib.insert(ip(B), route("10.1.0.0/16", B));

    assert_eq!(rib.best_route(ip("10.1.2.3")), Some(ip(B)));
    assert_eq!(rib.best_route(ip("10.2.0.1")), Some(ip(A)));
    assert_eq!(rib.best_route(ip("11.0.0.1")), None);
}

#[test]
fn best_route_tie_breaks() {
    // 2. highest local-pref
    let mut rib = rib_for(&[A, B]);
    rib.insert(ip(A), route("10.0.0.0/8", A));
    rib.insert(
        ip(B),
        Route {
            local_pref: 200,
            ..route("10.0.0.0/8", B)
        },
    );
    assert_eq!(rib.best_route(ip("10.0.0.1")), Some(ip(B)));

    // 3. self-origin beats
    let mut rib = rib_for(&[A, B]);
    rib.insert(ip(A), route("10.0.0.0/8", A));
    rib.insert(
        ip(B),
        Route {
            self_origin: true,
            ..route("10.0.0.0/8", B)
        },
    );
    assert_eq!(rib.best_route(ip("10.0.0.1")), Some(ip(B)));

    // 4. shortest AS path
    let mut rib = rib_for(&[A, B]);
    rib.insert(ip(A), route("10.0.0.0/8", A));
    rib.insert(
        ip(B),
        Route {
            as_path: vec![Asn(2)],
            ..route("10.0.0.0/8", B)
        },
    );
    assert_eq!(rib.best_route(ip("10.0.0.1")), Some(ip(B)));

    // 5. origin rank IGP > EGP > UNK
    let mut rib = rib_for(&[A, B]);
    rib.insert(
        ip(A),
        Route {
            origin: Origin::Unk,
            ..route("10.0.0.0/8", A)
        },
    );
    rib.insert(
        ip(B),
        Route {
            origin: Origin::Egp,
            ..route("10.0.0.0/8", B)
        },
    );
    assert_eq!(rib.best_route(ip("10.0.0.1")), Some(ip(B)));

    // 6. lowest neighbor address
    let mut rib = rib_for(&[A, B]);
    rib.insert(ip(A), route("10.0.0.0/8", A));
    rib.insert(ip(B), route("10.0.0.0/8", B));
    assert_eq!(rib.best_route(ip("10.0.0.1")), Some(ip(A)));
}

#[test]
fn entries_stay_under_their_neighbor() {
    let mut rib = rib_for(&[A, B]);
    rib.insert(ip(A), route("10.0.0.0/8", A));
    rib.insert(ip(B), route("10.1.0.0/16", B));
    rib.insert(ip(A), route("192.0.0.0/24", A));

    for (neighbor, route) in rib.iter() {
        assert_eq!(route.learned_from, neighbor);
    }
}
