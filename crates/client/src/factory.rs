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

//! Scheme based transport selection
//!
//! | scheme          | transport               |
//! |-----------------|-------------------------|
//! | `http`, `https` | [`HttpTransport`]       |
//! | `tcp`           | [`TcpTransport`]        |
//! | `udp`           | [`UdpTransport`]        |
//! | `unix`          | `UnixSocketTransport`   |

use bon::Builder;
use tracing::{debug, info};

use crate::{
    client::InfluxDb,
    connection_url::ConnectionUrl,
    error::{Error, Result},
    transport::{EndpointVersion, HttpTransport, Proxy, TcpTransport, Transport, UdpTransport},
};

/// Constructs a transport from a parsed URL
type Constructor = fn(&ConnectionUrl, EndpointVersion) -> Result<Box<dyn Transport>>;

/// Fixed scheme table, never modified at runtime
const BACKENDS: &[(&str, Constructor)] = &[
    ("udp", with_udp_transport as Constructor),
    ("tcp", with_tcp_transport as Constructor),
    ("http", with_http_transport as Constructor),
    ("https", with_http_transport as Constructor),
    #[cfg(unix)]
    ("unix", with_unix_socket_transport as Constructor),
];

fn with_http_transport(
    url: &ConnectionUrl,
    version: EndpointVersion,
) -> Result<Box<dyn Transport>> {
    let mut transport = HttpTransport::new(url.as_str(), version)?;
    if !url.user().is_empty() {
        transport.set_basic_authentication(url.user(), url.password())?;
    }
    Ok(Box::new(transport))
}

fn with_tcp_transport(url: &ConnectionUrl, _: EndpointVersion) -> Result<Box<dyn Transport>> {
    Ok(Box::new(TcpTransport::from_url(url)?))
}

fn with_udp_transport(url: &ConnectionUrl, _: EndpointVersion) -> Result<Box<dyn Transport>> {
    Ok(Box::new(UdpTransport::from_url(url)?))
}

#[cfg(unix)]
fn with_unix_socket_transport(
    url: &ConnectionUrl,
    _: EndpointVersion,
) -> Result<Box<dyn Transport>> {
    Ok(Box::new(crate::transport::UnixSocketTransport::from_url(url)?))
}

/// Picks and constructs the transport matching the URL scheme
///
/// # Errors
/// * `Error::IllFormedUri` when the URL has no scheme
/// * `Error::UnsupportedBackend` when the scheme is not in the table
/// * any construction error of the selected transport
pub fn resolve<S: AsRef<str>>(url: S, version: EndpointVersion) -> Result<Box<dyn Transport>> {
    let parsed = ConnectionUrl::parse(url)?;

    let (_, constructor) = BACKENDS
        .iter()
        .find(|(scheme, _)| *scheme == parsed.scheme())
        .ok_or_else(|| Error::UnsupportedBackend {
            scheme: parsed.scheme().to_string(),
        })?;

    debug!("Selected {} backend", parsed.scheme());
    constructor(&parsed, version)
}

/// Optional settings applied by [`connect_with_options`]
#[derive(Debug, Clone, Default, Builder)]
pub struct Options {
    /// Defaults to [`EndpointVersion::V1`]
    pub endpoint_version: Option<EndpointVersion>,
    pub proxy:            Option<Proxy>,
    #[builder(into)]
    pub api_token:        Option<String>,
}

/// Connects a client to `url` using the given endpoint version
pub fn connect<S: AsRef<str>>(url: S, version: EndpointVersion) -> Result<InfluxDb> {
    Ok(InfluxDb::new(resolve(url, version)?))
}

/// Connects a v1 client that routes requests through `proxy`
pub fn connect_with_proxy<S: AsRef<str>>(url: S, proxy: &Proxy) -> Result<InfluxDb> {
    let mut transport = resolve(url, EndpointVersion::V1)?;
    transport.set_proxy(proxy)?;
    Ok(InfluxDb::new(transport))
}

/// Connects a client, applying the proxy and then the API token from
/// `options`
pub fn connect_with_options<S: AsRef<str>>(url: S, options: &Options) -> Result<InfluxDb> {
    let version = options.endpoint_version.unwrap_or_default();
    let mut transport = resolve(url, version)?;

    if let Some(proxy) = &options.proxy {
        transport.set_proxy(proxy)?;
    }
    if let Some(token) = &options.api_token {
        transport.set_api_token(token)?;
    }

    info!("Connected {} client (endpoint {})", transport.kind(), version);
    Ok(InfluxDb::new(transport))
}
