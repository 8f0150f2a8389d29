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

use std::io;

use clap::Args;
use snafu::{ResultExt, Whatever, ensure_whatever};
use tracing::info;

use crate::connection::ConnectionArgs;

#[derive(Debug, Clone, Args)]
pub(crate) struct WriteArgs {
    /// Line protocol records; read from stdin when omitted
    lines: Vec<String>,
}

/// Writes line protocol records
pub(crate) fn run(connection: &ConnectionArgs, args: WriteArgs) -> Result<(), Whatever> {
    let payload = if args.lines.is_empty() {
        io::read_to_string(io::stdin()).whatever_context("Failed to read stdin")?
    } else {
        args.lines.join("\n")
    };
    let payload = payload.trim_end().to_string();
    ensure_whatever!(!payload.is_empty(), "Nothing to write");

    let records = payload.lines().count();
    let mut db = connection.connect()?;
    db.write(payload).whatever_context("Write failed")?;

    info!("Wrote {} record(s) via {}", records, db.transport_kind());
    Ok(())
}
