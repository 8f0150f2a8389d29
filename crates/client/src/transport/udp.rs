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

use std::net::UdpSocket;

use snafu::ResultExt;
use tracing::{debug, info};

use crate::{
    connection_url::ConnectionUrl,
    error::{IoSnafu, Result},
    transport::{Transport, TransportKind},
};

/// Fire-and-forget UDP transport
///
/// Each payload goes out as a single datagram; delivery is not confirmed.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Binds an ephemeral local socket and targets `host:port`
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let bind_addr = if host.contains(':') { "[::]:0" } else { "0.0.0.0:0" };
        let socket = UdpSocket::bind(bind_addr).context(IoSnafu)?;
        socket.connect((host, port)).context(IoSnafu)?;

        info!("Created UDP transport for {}:{}", host, port);
        Ok(Self { socket })
    }

    pub(crate) fn from_url(url: &ConnectionUrl) -> Result<Self> {
        let (host, port) = super::tcp::host_and_port(url)?;
        Self::new(&host, port)
    }
}

impl Transport for UdpTransport {
    fn kind(&self) -> TransportKind { TransportKind::Udp }

    fn send(&mut self, payload: String) -> Result<()> {
        debug!("Sending {} byte datagram", payload.len());
        self.socket.send(payload.as_bytes()).context(IoSnafu)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::Error;

    #[test]
    fn test_send_datagram() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let port = receiver.local_addr().unwrap().port();

        let mut transport = UdpTransport::new("127.0.0.1", port).unwrap();
        transport.send("cpu,host=a value=1".to_string()).unwrap();

        let mut buf = [0u8; 1024];
        let n = receiver.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"cpu,host=a value=1");
    }

    #[test]
    fn test_query_unsupported() {
        let mut transport = UdpTransport::new("127.0.0.1", 8089).unwrap();
        assert!(matches!(
            transport.query("SELECT 1"),
            Err(Error::UnsupportedOperation { operation: "query", .. })
        ));
    }
}
