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

use std::{
    os::unix::net::UnixDatagram,
    path::{Path, PathBuf},
};

use snafu::ResultExt;
use tracing::{debug, info};

use crate::{
    connection_url::ConnectionUrl,
    error::{IoSnafu, Result},
    transport::{Transport, TransportKind},
};

/// Unix domain datagram socket transport
#[derive(Debug)]
pub struct UnixSocketTransport {
    socket: UnixDatagram,
    path:   PathBuf,
}

impl UnixSocketTransport {
    /// Targets the socket at `path`; the socket need not exist yet
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let socket = UnixDatagram::unbound().context(IoSnafu)?;
        let path = path.as_ref().to_path_buf();

        info!("Created Unix socket transport for {}", path.display());
        Ok(Self { socket, path })
    }

    pub(crate) fn from_url(url: &ConnectionUrl) -> Result<Self> { Self::new(url.path()) }

    pub fn path(&self) -> &Path { &self.path }
}

impl Transport for UnixSocketTransport {
    fn kind(&self) -> TransportKind { TransportKind::Unix }

    fn send(&mut self, payload: String) -> Result<()> {
        debug!("Sending {} bytes to {}", payload.len(), self.path.display());
        self.socket
            .send_to(payload.as_bytes(), &self.path)
            .context(IoSnafu)?;
        Ok(())
    }
}
