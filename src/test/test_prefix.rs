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

use crate::types::{Prefix, PrefixError};

fn ip(s: &str) -> Ipv4Addr {
    s.parse().unwrap()
}

fn prefix(s: &str) -> Prefix {
    s.parse().unwrap()
}

#[test]
fn quad_u32_round_trip() {
    for quad in ["0.0.0.0", "10.0.0.1", "192.168.255.1", "255.255.255.255"] {
        let addr = ip(quad);
        assert_eq!(Ipv4Addr::from(u32::from(addr)), addr);
    }
    assert_eq!(u32::from(ip("1.2.3.4")), 0x0102_0304);
}

#[test]
fn new_from_netmask() {
    let p = Prefix::new(ip("192.0.2.0"), ip("255.255.255.0")).unwrap();
    assert_eq!(p.network(), ip("192.0.2.0"));
    assert_eq!(p.netmask(), ip("255.255.255.0"));
    assert_eq!(p.prefix_len(), 24);
}

#[test]
fn new_clears_host_bits() {
    let p = Prefix::new(ip("10.1.2.3"), ip("255.0.0.0")).unwrap();
    assert_eq!(p.network(), ip("10.0.0.0"));
}

#[test]
fn non_contiguous_netmask_rejected() {
    assert_eq!(
        Prefix::new(ip("10.0.0.0"), ip("255.0.255.0")),
        Err(PrefixError::InvalidNetmask(ip("255.0.255.0")))
    );
}

#[test]
fn mask_len_edge_cases() {
    assert_eq!(Prefix::new(ip("0.0.0.0"), ip("0.0.0.0")).unwrap().prefix_len(), 0);
    assert_eq!(
        Prefix::new(ip("10.0.0.1"), ip("255.255.255.255")).unwrap().prefix_len(),
        32
    );
    assert_eq!(
        Prefix::new(ip("10.0.0.0"), ip("255.255.254.0")).unwrap().prefix_len(),
        23
    );
}

#[test]
fn contains_boundaries() {
    let p = prefix("192.0.2.0/24");
    assert!(p.contains(ip("192.0.2.0")));
    assert!(p.contains(ip("192.0.2.255")));
    assert!(!p.contains(ip("192.0.3.0")));
    assert!(!p.contains(ip("192.0.1.255")));

    let all = prefix("0.0.0.0/0");
    assert!(all.contains(ip("255.255.255.255")));
}

#[test]
fn siblings_merge_one_bit() {
    let a = prefix("192.0.0.0/24");
    let b = prefix("192.0.1.0/24");
    assert!(a.is_sibling_of(&b));
    assert!(b.is_sibling_of(&a));
    assert_eq!(a.aggregate(&b), Some(prefix("192.0.0.0/23")));
    // the merged prefix carries the numerically lower network, whichever side starts the merge
    assert_eq!(b.aggregate(&a), Some(prefix("192.0.0.0/23")));
}

#[test]
fn non_siblings() {
    // differ in a bit above the last masked one
    assert!(!prefix("192.0.1.0/24").is_sibling_of(&prefix("192.0.2.0/24")));
    // different mask lengths
    assert!(!prefix("192.0.0.0/24").is_sibling_of(&prefix("192.0.0.0/23")));
    // identical prefixes
    assert!(!prefix("192.0.0.0/24").is_sibling_of(&prefix("192.0.0.0/24")));
    assert_eq!(prefix("192.0.1.0/24").aggregate(&prefix("192.0.2.0/24")), None);
}

#[test]
fn slash_zero_has_no_sibling() {
    let all = prefix("0.0.0.0/0");
    assert!(!all.is_sibling_of(&all));
    assert_eq!(all.aggregate(&all), None);
}

#[test]
fn host_prefixes_can_pair() {
    let a = prefix("10.0.0.0/32");
    let b = prefix("10.0.0.1/32");
    assert_eq!(a.aggregate(&b), Some(prefix("10.0.0.0/31")));
    assert!(!a.is_sibling_of(&prefix("10.0.0.2/32")));
}

#[test]
fn serde_as_network_netmask() {
    let json = serde_json::json!({"network": "192.0.2.0", "netmask": "255.255.255.0"});
    let p: Prefix = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(p, prefix("192.0.2.0/24"));
    assert_eq!(serde_json::to_value(p).unwrap(), json);
}

#[test]
fn serde_rejects_bad_netmask() {
    let json = serde_json::json!({"network": "192.0.2.0", "netmask": "0.255.255.0"});
    assert!(serde_json::from_value::<Prefix>(json).is_err());
}
