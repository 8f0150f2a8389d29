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

use clap::{Parser, Subcommand};
use snafu::{ResultExt, Whatever};
use tracing::{debug, info};

mod build_info;
mod command_database;
mod command_query;
mod command_write;
mod connection;

#[derive(Debug, Parser)]
#[command(
    name = "fluxwire",
    about = "Line protocol time series client",
    author = build_info::AUTHOR,
    version = build_info::FULL_VERSION,
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    connection: connection::ConnectionArgs,

    /// Log level used when RUST_LOG is not set
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a query and print the response
    Query(command_query::QueryArgs),
    /// Run a management statement and print the response
    Execute(command_query::QueryArgs),
    /// Write line protocol records
    Write(command_write::WriteArgs),
    /// Create the database named in the URL (v1 endpoints only)
    CreateDatabase,
}

fn main() -> Result<(), Whatever> {
    human_panic::setup_panic!();

    // Variables from .env must be visible before arguments are parsed
    let dotenv = fluxwire_common::env::load_dotenv().whatever_context("Invalid .env file")?;

    let cli = Cli::parse();
    fluxwire_common::logging::init(fluxwire_common::logging::parse_level(&cli.log_level));

    info!("Starting fluxwire version {}", build_info::FULL_VERSION);
    if let Some(path) = dotenv {
        debug!("Using environment from {}", path.display());
    }

    match cli.command {
        Commands::Query(args) => command_query::run(&cli.connection, args)?,
        Commands::Execute(args) => command_query::execute(&cli.connection, args)?,
        Commands::Write(args) => command_write::run(&cli.connection, args)?,
        Commands::CreateDatabase => command_database::create(&cli.connection)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use fluxwire_client::EndpointVersion;

    use super::*;

    #[test]
    fn test_cli_definition() { Cli::command().debug_assert(); }

    #[test]
    fn test_parse_query_v2() {
        let cli = Cli::try_parse_from([
            "fluxwire",
            "--url",
            "http://localhost:8086?org=acme&bucket=metrics",
            "--endpoint-version",
            "v2",
            "--token",
            "secret",
            "query",
            "SELECT 1",
        ])
        .unwrap();
        assert_eq!(cli.connection.endpoint_version, EndpointVersion::V2);

        let options = cli.connection.options();
        assert_eq!(options.endpoint_version, Some(EndpointVersion::V2));
        assert_eq!(options.api_token.as_deref(), Some("secret"));
        assert!(matches!(cli.command, Commands::Query(_)));
    }

    #[test]
    fn test_parse_rejects_unknown_version() {
        let result = Cli::try_parse_from([
            "fluxwire",
            "--url",
            "http://localhost:8086?db=x",
            "--endpoint-version",
            "v3",
            "create-database",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_proxy_user_requires_proxy() {
        let result = Cli::try_parse_from([
            "fluxwire",
            "--url",
            "http://localhost:8086?db=x",
            "--proxy-user",
            "bob",
            "create-database",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_proxy_with_credentials() {
        let cli = Cli::try_parse_from([
            "fluxwire",
            "--url",
            "http://localhost:8086?db=x",
            "--proxy",
            "http://proxy:3128",
            "--proxy-user",
            "bob",
            "--proxy-password",
            "hunter2",
            "write",
            "cpu value=1",
        ])
        .unwrap();

        let proxy = cli.connection.options().proxy.unwrap();
        assert_eq!(proxy.address(), "http://proxy:3128");
        assert_eq!(proxy.authentication().unwrap().user, "bob");
    }
}
