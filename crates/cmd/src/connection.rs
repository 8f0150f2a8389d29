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

use clap::Args;
use fluxwire_client::{EndpointVersion, InfluxDb, Options, Proxy, factory};
use snafu::{ResultExt, Whatever};
use tracing::debug;

/// Where and how to connect; every flag can also come from the environment
#[derive(Debug, Clone, Args)]
pub(crate) struct ConnectionArgs {
    /// Connection URL, e.g. http://localhost:8086?db=telemetry or
    /// udp://localhost:8089
    #[arg(long, env = "FLUXWIRE_URL")]
    pub(crate) url: String,

    /// Server API generation: v1 (db/rp) or v2 (org/bucket)
    #[arg(
        long,
        env = "FLUXWIRE_ENDPOINT_VERSION",
        default_value = "v1",
        value_parser = EndpointVersion::parse
    )]
    pub(crate) endpoint_version: EndpointVersion,

    /// API token sent as `Authorization: Token <token>`
    #[arg(long, env = "FLUXWIRE_TOKEN", hide_env_values = true)]
    pub(crate) token: Option<String>,

    /// HTTP(S) proxy address
    #[arg(long, env = "FLUXWIRE_PROXY")]
    pub(crate) proxy: Option<String>,

    /// Proxy user name
    #[arg(long, env = "FLUXWIRE_PROXY_USER", requires = "proxy")]
    pub(crate) proxy_user: Option<String>,

    /// Proxy password
    #[arg(
        long,
        env = "FLUXWIRE_PROXY_PASSWORD",
        hide_env_values = true,
        requires = "proxy_user"
    )]
    pub(crate) proxy_password: Option<String>,
}

impl ConnectionArgs {
    /// Client options described by these arguments
    pub(crate) fn options(&self) -> Options {
        let proxy = self.proxy.as_ref().map(|address| {
            let proxy = Proxy::new(address);
            match &self.proxy_user {
                Some(user) => {
                    proxy.with_authentication(user, self.proxy_password.clone().unwrap_or_default())
                }
                None => proxy,
            }
        });

        Options::builder()
            .endpoint_version(self.endpoint_version)
            .maybe_proxy(proxy)
            .maybe_api_token(self.token.clone())
            .build()
    }

    pub(crate) fn connect(&self) -> Result<InfluxDb, Whatever> {
        debug!("Connecting to {} (endpoint {})", redact(&self.url), self.endpoint_version);
        factory::connect_with_options(&self.url, &self.options())
            .with_whatever_context(|_| format!("Failed to connect to {}", redact(&self.url)))
    }
}

/// Hides the password of a URL for logs and error messages
fn redact(url: &str) -> String {
    match fluxwire_client::ConnectionUrl::parse(url) {
        Ok(parsed) if !parsed.password().is_empty() => {
            url.replacen(&format!(":{}@", encoded_password(url)), ":***@", 1)
        }
        _ => url.to_string(),
    }
}

fn encoded_password(url: &str) -> &str {
    let authority = url.split_once("://").map_or(url, |(_, rest)| rest);
    let user_info = authority.split_once('@').map_or("", |(info, _)| info);
    user_info.split_once(':').map_or("", |(_, password)| password)
}
