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

use std::{io::Write, net::TcpStream};

use snafu::{OptionExt, ResultExt};
use tracing::{debug, info};

use crate::{
    connection_url::ConnectionUrl,
    error::{IoSnafu, MissingHostSnafu, MissingPortSnafu, Result},
    transport::{Transport, TransportKind},
};

/// Line protocol over a persistent TCP stream
///
/// The connection is opened on construction; every payload is written
/// newline-terminated.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Connects to `host:port`
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let stream = TcpStream::connect((host, port)).context(IoSnafu)?;
        stream.set_nodelay(true).context(IoSnafu)?;

        info!("Created TCP transport for {}:{}", host, port);
        Ok(Self { stream })
    }

    pub(crate) fn from_url(url: &ConnectionUrl) -> Result<Self> {
        let (host, port) = host_and_port(url)?;
        Self::new(&host, port)
    }
}

/// Host and port of a socket transport URL; both must be present
pub(crate) fn host_and_port(url: &ConnectionUrl) -> Result<(String, u16)> {
    let scheme = url.scheme();
    if url.host().is_empty() {
        return MissingHostSnafu { scheme }.fail();
    }
    let port = url.port().context(MissingPortSnafu { scheme })?;
    // IPv6 literals come back bracketed
    let host = url.host().trim_start_matches('[').trim_end_matches(']');
    Ok((host.to_string(), port))
}

impl Transport for TcpTransport {
    fn kind(&self) -> TransportKind { TransportKind::Tcp }

    fn send(&mut self, mut payload: String) -> Result<()> {
        if !payload.ends_with('\n') {
            payload.push('\n');
        }
        debug!("Writing {} bytes", payload.len());
        self.stream.write_all(payload.as_bytes()).context(IoSnafu)?;
        self.stream.flush().context(IoSnafu)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Read, net::TcpListener, thread};

    use super::*;
    use crate::error::Error;

    #[test]
    fn test_send_appends_newline_once() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let reader = thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let mut received = String::new();
            conn.read_to_string(&mut received).unwrap();
            received
        });

        {
            let mut transport = TcpTransport::new("127.0.0.1", port).unwrap();
            transport.send("cpu value=1".to_string()).unwrap();
            transport.send("mem value=2\n".to_string()).unwrap();
        }

        assert_eq!(reader.join().unwrap(), "cpu value=1\nmem value=2\n");
    }

    #[test]
    fn test_host_and_port_requires_port() {
        let url = ConnectionUrl::parse("tcp://localhost").unwrap();
        let err = host_and_port(&url).unwrap_err();
        assert!(matches!(err, Error::MissingPort { .. }), "got {err:?}");
    }

    #[test]
    fn test_host_and_port_strips_ipv6_brackets() {
        let url = ConnectionUrl::parse("tcp://[::1]:8094").unwrap();
        assert_eq!(host_and_port(&url).unwrap(), ("::1".to_string(), 8094));
    }

    #[test]
    fn test_execute_unsupported() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let mut transport = TcpTransport::new("127.0.0.1", port).unwrap();
        assert!(matches!(
            transport.execute("SHOW DATABASES"),
            Err(Error::UnsupportedOperation { .. })
        ));
    }
}
