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

//! The router daemon. Construction failures are fatal; after that the process runs until
//! killed.

use clap::Parser;

use pvrouter::neighbor::NeighborConfig;
use pvrouter::network;
use pvrouter::router::Router;
use pvrouter::types::Asn;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// AS number of this router
    asn: u32,

    /// Neighbor descriptors of the form `port-ip-relation`, e.g. `7831-192.168.0.2-cust`
    #[arg(required = true)]
    connections: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let neighbors = args
        .connections
        .iter()
        .map(|s| s.parse())
        .collect::<Result<Vec<NeighborConfig>, _>>()?;

    let router = Router::new(Asn(args.asn), neighbors)?;
    log::info!(
        "router at {} starting up with {} neighbors",
        router.asn(),
        router.neighbors().len()
    );

    network::serve(router).await?;
    Ok(())
}
