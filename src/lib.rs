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

#![deny(missing_docs, missing_debug_implementations)]

//! # pvrouter
//!
//! A simplified inter-domain path-vector router modeled on BGP. The router maintains sessions
//! with a fixed set of neighbors over UDP datagrams carrying JSON messages. It learns routes
//! from `update` announcements, revokes them on `withdraw`, forwards `data` packets along the
//! best matching route, and re-advertises what it learns subject to the commercial relation
//! (customer / peer / provider) of each neighbor, i.e. the usual valley-free export policy.
//!
//! ## Structure
//!
//! The core is [`router::Router`]: it consumes decoded [`msg::Envelope`] messages tagged with
//! the neighbor interface they arrived on and returns the messages to send out. It owns the
//! forwarding table ([`rib::Rib`]) and the append-only announcement log ([`rib::RibLog`]) used
//! to rebuild the table when aggregation makes an in-place withdrawal impossible. The
//! [`network`] module supplies the sockets and the single-threaded event loop; everything is
//! processed one datagram at a time, so no locking exists anywhere.
//!
//! ## Example
//!
//! ```
//! use pvrouter::msg::{Body, Empty, Envelope};
//! use pvrouter::router::Router;
//! use pvrouter::types::Asn;
//!
//! # fn main() -> Result<(), pvrouter::types::ConfigError> {
//! let neighbors = ["7001-192.168.0.2-cust", "7002-172.16.0.2-peer"]
//!     .iter()
//!     .map(|s| s.parse())
//!     .collect::<Result<Vec<_>, _>>()?;
//! let mut router = Router::new(Asn(7), neighbors)?;
//!
//! // one handshake per neighbor is sent at startup
//! assert_eq!(router.startup_messages().len(), 2);
//!
//! // a handshake from a neighbor requires no reply
//! let hello = Envelope::new(
//!     "192.168.0.2".parse().unwrap(),
//!     "192.168.0.1".parse().unwrap(),
//!     Body::Handshake(Empty {}),
//! );
//! assert!(router.handle_message("192.168.0.2".parse().unwrap(), hello).is_empty());
//! # Ok(())
//! # }
//! ```

pub mod bgp;
pub mod msg;
pub mod neighbor;
pub mod network;
pub mod policy;
pub mod rib;
pub mod router;
pub mod types;

#[cfg(test)]
mod test;
