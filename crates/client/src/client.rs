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

use tracing::debug;

use crate::{
    error::Result,
    transport::{Transport, TransportKind},
};

/// Thin user facing client over a [`Transport`]
///
/// Payloads are passed through untouched; building line protocol is left
/// to the caller.
///
/// # Examples
///
/// ```rust,no_run
/// use fluxwire_client::{EndpointVersion, factory};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut db = factory::connect("http://localhost:8086?db=telemetry", EndpointVersion::V1)?;
///     db.create_database()?;
///     db.write("cpu,host=a usage=0.64")?;
///     println!("{}", db.query("SELECT * FROM cpu")?);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct InfluxDb {
    transport: Box<dyn Transport>,
}

impl InfluxDb {
    pub fn new(transport: Box<dyn Transport>) -> Self { Self { transport } }

    /// Runs a query and returns the server's response body
    pub fn query(&mut self, query: &str) -> Result<String> {
        debug!("Running query: {}", query);
        self.transport.query(query)
    }

    /// Runs a management statement, e.g. `SHOW DATABASES`
    pub fn execute(&mut self, command: &str) -> Result<String> { self.transport.execute(command) }

    /// Writes one or more newline separated line protocol records
    pub fn write<S: Into<String>>(&mut self, line_protocol: S) -> Result<()> {
        self.transport.send(line_protocol.into())
    }

    /// Creates the database named in the connection URL (v1 only)
    pub fn create_database(&mut self) -> Result<()> { self.transport.create_database() }

    pub fn transport_kind(&self) -> TransportKind { self.transport.kind() }

    /// Gives back the underlying transport
    pub fn into_transport(self) -> Box<dyn Transport> { self.transport }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Debug, Default)]
    struct Recording {
        sent: Arc<Mutex<Vec<String>>>,
    }

    impl Transport for Recording {
        fn kind(&self) -> TransportKind { TransportKind::Tcp }

        fn send(&mut self, payload: String) -> Result<()> {
            self.sent.lock().unwrap().push(payload);
            Ok(())
        }
    }

    #[test]
    fn test_write_passes_payload_through() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mut db = InfluxDb::new(Box::new(Recording { sent: sent.clone() }));

        db.write("cpu value=1\ncpu value=2").unwrap();
        assert_eq!(*sent.lock().unwrap(), vec!["cpu value=1\ncpu value=2"]);
        assert_eq!(db.transport_kind(), TransportKind::Tcp);
    }

    #[test]
    fn test_query_on_write_only_transport_fails() {
        let mut db = InfluxDb::new(Box::new(Recording::default()));
        let err = db.query("SELECT 1").unwrap_err();
        assert_eq!(err.to_string(), "query is not supported by the tcp transport");
    }
}
