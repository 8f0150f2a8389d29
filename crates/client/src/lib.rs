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

//! Fluxwire Client Library
//!
//! A blocking client for line protocol time series databases. One
//! connection URL selects both the wire transport and the server API
//! generation being addressed:
//!
//! - **v1** endpoints address data by database and retention policy
//!   (`?db=telemetry&rp=weekly`)
//! - **v2** endpoints address data by organization and bucket
//!   (`?org=acme&bucket=telemetry`)
//!
//! # Transports
//!
//! | scheme          | reads | writes | notes                                  |
//! |-----------------|-------|--------|----------------------------------------|
//! | `http`/`https`  | yes   | yes    | basic auth from URL user info, tokens  |
//! | `tcp`           | no    | yes    | newline terminated stream              |
//! | `udp`           | no    | yes    | one datagram per write                 |
//! | `unix`          | no    | yes    | datagram socket, unix targets only     |
//!
//! # Examples
//!
//! ```rust,no_run
//! use fluxwire_client::{EndpointVersion, Options, Proxy, factory};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = Options::builder()
//!         .endpoint_version(EndpointVersion::V2)
//!         .api_token("my-token")
//!         .proxy(Proxy::new("http://proxy.internal:3128").with_authentication("bob", "secret"))
//!         .build();
//!
//!     let mut db =
//!         factory::connect_with_options("https://influx.example.com?org=acme&bucket=metrics", &options)?;
//!     db.write("cpu,host=a usage=0.64")?;
//!     Ok(())
//! }
//! ```
//!
//! Every call blocks until the server answered or the 10 second
//! connect/read timeout expired. Nothing is retried.

pub mod client;
pub mod connection_url;
pub mod error;
pub mod factory;
pub mod transport;

pub use client::InfluxDb;
pub use connection_url::ConnectionUrl;
pub use error::{ConfigurationError, Error, RequestErrorCode, Result};
pub use factory::Options;
pub use transport::{EndpointVersion, HttpTransport, Proxy, Transport, TransportKind};
