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

//! Wire transports
//!
//! Every backend implements [`Transport`]. Only HTTP supports the full
//! surface; the socket backends are write-only and reject everything else
//! with [`Error::UnsupportedOperation`].

pub mod http;
pub mod tcp;
pub mod udp;
#[cfg(unix)]
pub mod unix;

use std::fmt;

use strum_macros::{Display, EnumString};

use crate::error::{Error, Result};

pub use self::http::HttpTransport;
pub use self::tcp::TcpTransport;
pub use self::udp::UdpTransport;
#[cfg(unix)]
pub use self::unix::UnixSocketTransport;

/// Server API generation a transport talks to
///
/// `V1` addresses data by database and retention policy, `V2` by
/// organization and bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
pub enum EndpointVersion {
    #[default]
    #[strum(serialize = "v1")]
    V1,
    #[strum(serialize = "v2")]
    V2,
}

impl EndpointVersion {
    /// Parses `v1` or `v2`
    pub fn parse(version: &str) -> Result<Self> {
        version
            .parse()
            .map_err(|_| Error::UnknownEndpointVersion {
                version: version.to_string(),
            })
    }
}

/// Which backend a transport is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TransportKind {
    Http,
    Tcp,
    Udp,
    Unix,
}

/// User name and password pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user:     String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// HTTP(S) proxy applied to both plain and TLS requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    address:        String,
    authentication: Option<Credentials>,
}

impl Proxy {
    /// Creates a proxy for the given address, e.g. `http://proxy:3128`
    pub fn new<S: Into<String>>(address: S) -> Self {
        Self {
            address:        address.into(),
            authentication: None,
        }
    }

    /// Adds credentials sent to the proxy
    pub fn with_authentication<U: Into<String>, P: Into<String>>(
        mut self,
        user: U,
        password: P,
    ) -> Self {
        self.authentication = Some(Credentials {
            user:     user.into(),
            password: password.into(),
        });
        self
    }

    pub fn address(&self) -> &str { &self.address }

    pub fn authentication(&self) -> Option<&Credentials> { self.authentication.as_ref() }
}

/// Capability set shared by all wire backends.
///
/// Calls are blocking: each returns once the full round trip finished or
/// failed. Implementations keep mutable session state, so a single instance
/// must not be shared between threads without external synchronization.
///
/// Only [`Transport::send`] is mandatory; the remaining operations default
/// to [`Error::UnsupportedOperation`].
pub trait Transport: fmt::Debug + Send {
    /// Which backend this is
    fn kind(&self) -> TransportKind;

    /// Writes a line protocol payload
    fn send(&mut self, payload: String) -> Result<()>;

    /// Runs a query and returns the raw response body
    fn query(&mut self, query: &str) -> Result<String> {
        let _ = query;
        Err(self.unsupported("query"))
    }

    /// Runs a management statement and returns the raw response body
    fn execute(&mut self, command: &str) -> Result<String> {
        let _ = command;
        Err(self.unsupported("execute"))
    }

    /// Creates the database named by the connection URL
    fn create_database(&mut self) -> Result<()> { Err(self.unsupported("create_database")) }

    /// Routes subsequent requests through a proxy
    fn set_proxy(&mut self, proxy: &Proxy) -> Result<()> {
        let _ = proxy;
        Err(self.unsupported("set_proxy"))
    }

    /// Enables basic authentication for subsequent requests
    fn set_basic_authentication(&mut self, user: &str, password: &str) -> Result<()> {
        let _ = (user, password);
        Err(self.unsupported("set_basic_authentication"))
    }

    /// Sends `Authorization: Token <token>` with subsequent requests
    fn set_api_token(&mut self, token: &str) -> Result<()> {
        let _ = token;
        Err(self.unsupported("set_api_token"))
    }

    #[doc(hidden)]
    fn unsupported(&self, operation: &'static str) -> Error {
        Error::UnsupportedOperation {
            operation,
            transport: self.kind().to_string(),
        }
    }
}
