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

//! The datagram transport driving the router.
//!
//! One UDP socket is bound per neighbor; which socket a datagram arrives on identifies the
//! inbound interface. Reader tasks feed `(interface, datagram)` pairs into a channel, and a
//! single loop drains it, dispatching one message to completion before looking at the next.
//! Outbound sends are best-effort: a failure is logged and does not touch the tables.

use std::collections::BTreeMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::mpsc;

use crate::msg::Envelope;
use crate::router::Router;

const MAX_DATAGRAM: usize = 65535;

/// Per-neighbor socket together with the address the neighbor listens on.
type SocketMap = BTreeMap<Ipv4Addr, (Arc<UdpSocket>, SocketAddr)>;

/// Bind one socket per neighbor, send the startup handshakes, and run the dispatch loop. Only
/// binding can fail; afterwards this runs until the process is terminated.
pub async fn serve(mut router: Router) -> std::io::Result<()> {
    let (tx, mut rx) = mpsc::channel::<(Ipv4Addr, Vec<u8>)>(8192);

    let mut sockets: SocketMap = BTreeMap::new();
    for config in router.neighbors().iter() {
        let socket = Arc::new(UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await?);
        let neighbor = config.addr;
        let target = SocketAddr::from((Ipv4Addr::LOCALHOST, config.port));
        sockets.insert(neighbor, (socket.clone(), target));

        let tx = tx.clone();
        tokio::spawn(async move {
            let mut buf = vec![0u8; MAX_DATAGRAM];
            loop {
                match socket.recv_from(&mut buf).await {
                    Ok((len, _)) => {
                        if tx.send((neighbor, buf[..len].to_vec())).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        log::warn!("receive error on the link towards {neighbor}: {e}");
                    }
                }
            }
        });
    }
    drop(tx);

    for (neighbor, msg) in router.startup_messages() {
        send(&sockets, neighbor, &msg).await;
    }

    while let Some((srcif, datagram)) = rx.recv().await {
        log::trace!(
            "received message '{}' from {srcif}",
            String::from_utf8_lossy(&datagram)
        );
        let msg = match Envelope::decode(&datagram) {
            Ok(msg) => msg,
            Err(e) => {
                log::warn!("dropping malformed message from {srcif}: {e}");
                continue;
            }
        };
        for (target, out) in router.handle_message(srcif, msg) {
            send(&sockets, target, &out).await;
        }
    }
    Ok(())
}

async fn send(sockets: &SocketMap, target: Ipv4Addr, msg: &Envelope) {
    let Some((socket, dest)) = sockets.get(&target) else {
        log::warn!("no socket towards {target}; dropping message");
        return;
    };
    let bytes = match msg.encode() {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("failed to encode message towards {target}: {e}");
            return;
        }
    };
    if let Err(e) = socket.send_to(&bytes, dest).await {
        log::warn!("send towards {target} failed: {e}");
    }
}
