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

//! Connection URL parsing
//!
//! Supports the format
//! `<scheme>://[user[:pass]@]host[:port][/path][?db=..&rp=..|?bucket=..&org=..]`
//! where the scheme is one of `http`, `https`, `tcp`, `udp` or `unix`.

use snafu::ensure;
use url::Url;

use crate::error::{IllFormedUriSnafu, Result};

/// A connection URL decomposed into the parts the factory dispatches on.
///
/// The raw string is kept verbatim because transports derive their own
/// endpoint and query parameters from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionUrl {
    raw:      String,
    scheme:   String,
    user:     String,
    password: String,
    host:     String,
    port:     Option<u16>,
    path:     String,
}

impl ConnectionUrl {
    /// Parses a connection string
    ///
    /// # Errors
    /// Returns `Error::IllFormedUri` when no scheme can be determined
    pub fn parse<S: AsRef<str>>(raw: S) -> Result<Self> {
        let raw = raw.as_ref();
        let scheme = raw.split_once("://").map(|(scheme, _)| scheme).unwrap_or("");
        ensure!(
            !scheme.is_empty(),
            IllFormedUriSnafu {
                url: raw.to_string(),
            }
        );

        let parsed = Url::parse(raw).map_err(|_| {
            IllFormedUriSnafu {
                url: raw.to_string(),
            }
            .build()
        })?;

        Ok(Self {
            raw:      raw.to_string(),
            scheme:   scheme.to_string(),
            user:     decode(parsed.username()),
            password: parsed.password().map(decode).unwrap_or_default(),
            host:     parsed.host_str().unwrap_or_default().to_string(),
            port:     parsed.port(),
            path:     parsed.path().to_string(),
        })
    }

    /// The URL exactly as supplied by the caller
    pub fn as_str(&self) -> &str { &self.raw }

    /// Scheme exactly as written, e.g. `http`
    pub fn scheme(&self) -> &str { &self.scheme }

    /// Percent-decoded user name, empty when absent
    pub fn user(&self) -> &str { &self.user }

    /// Percent-decoded password, empty when absent
    pub fn password(&self) -> &str { &self.password }

    pub fn host(&self) -> &str { &self.host }

    pub fn port(&self) -> Option<u16> { self.port }

    pub fn path(&self) -> &str { &self.path }
}

fn decode(component: &str) -> String {
    urlencoding::decode(component)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| component.to_string())
}

/// Strips the query string from a URL, yielding the base endpoint.
///
/// A `/` immediately preceding the `?` is dropped as well, so both
/// `http://host:8086?db=x` and `http://host:8086/?db=x` give
/// `http://host:8086`.
pub fn endpoint_url(url: &str) -> &str {
    match url.find('?') {
        None => url,
        Some(pos) => {
            let base = &url[..pos];
            base.strip_suffix('/').unwrap_or(base)
        }
    }
}

/// Removes `user[:password]@` from the authority of a URL.
///
/// Credentials travel as explicit authentication instead of inside the
/// request URL.
pub fn strip_user_info(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 3;
    let authority_end = url[authority_start..]
        .find(['/', '?', '#'])
        .map_or(url.len(), |pos| authority_start + pos);

    match url[authority_start..authority_end].rfind('@') {
        Some(at) => format!("{}{}", &url[..authority_start], &url[authority_start + at + 1..]),
        None => url.to_string(),
    }
}

/// Extracts the value of a named query parameter.
///
/// Looks for `?<name>=` first and falls back to `&<name>=`; the first match
/// wins. The value runs up to the next `&` or the end of the string and is
/// returned as written. A missing parameter yields `None`, while a present
/// but empty one yields `Some("")`.
pub fn extract_parameter(url: &str, name: &str) -> Option<String> {
    let leading = format!("?{name}=");
    let following = format!("&{name}=");

    let (pos, needle) = url
        .find(&leading)
        .map(|pos| (pos, &leading))
        .or_else(|| url.find(&following).map(|pos| (pos, &following)))?;

    let value = &url[pos + needle.len()..];
    let value = value.split('&').next().unwrap_or_default();
    Some(value.to_string())
}
