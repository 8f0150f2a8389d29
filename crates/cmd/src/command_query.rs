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
use snafu::{ResultExt, Whatever};

use crate::connection::ConnectionArgs;

#[derive(Debug, Clone, Args)]
pub(crate) struct QueryArgs {
    /// Statement to run, e.g. "SELECT * FROM cpu LIMIT 10"
    statement: String,
}

/// Runs a query and prints the raw response body
pub(crate) fn run(connection: &ConnectionArgs, args: QueryArgs) -> Result<(), Whatever> {
    let mut db = connection.connect()?;
    let body = db
        .query(&args.statement)
        .whatever_context("Query failed")?;
    println!("{body}");
    Ok(())
}

/// Runs a management statement and prints the raw response body
pub(crate) fn execute(connection: &ConnectionArgs, args: QueryArgs) -> Result<(), Whatever> {
    let mut db = connection.connect()?;
    let body = db
        .execute(&args.statement)
        .whatever_context("Command failed")?;
    println!("{body}");
    Ok(())
}
