// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Basic usage example for the fluxwire client library
//!
//! Writes a couple of points and reads them back through both endpoint
//! generations. Expects servers on localhost:
//!
//! - a v1 server on port 8086 (`cargo run --example basic_usage`)
//! - optionally a v2 server on port 8087 with `FLUXWIRE_TOKEN` set

use fluxwire_client::{EndpointVersion, Options, factory};
use tracing::{Level, info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    // v1: database + retention policy
    let mut v1 = factory::connect("http://localhost:8086?db=example", EndpointVersion::V1)?;
    v1.create_database()?;
    v1.write("cpu,host=server01 usage=0.64\ncpu,host=server02 usage=0.32")?;
    let result = v1.query("SELECT * FROM cpu")?;
    info!("v1 query result: {}", result);

    // v2: organization + bucket, authorized by token
    match std::env::var("FLUXWIRE_TOKEN") {
        Ok(token) => {
            let options = Options::builder()
                .endpoint_version(EndpointVersion::V2)
                .api_token(token)
                .build();
            let mut v2 = factory::connect_with_options(
                "http://localhost:8087?org=example&bucket=example",
                &options,
            )?;
            v2.write("mem,host=server01 used_percent=41.2")?;
            info!("v2 write succeeded");

            // Database creation only exists on v1 endpoints
            if let Err(e) = v2.create_database() {
                info!("As expected: {}", e);
            }
        }
        Err(_) => warn!("FLUXWIRE_TOKEN not set, skipping v2 example"),
    }

    Ok(())
}
