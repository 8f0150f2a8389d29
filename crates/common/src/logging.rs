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

use std::sync::OnceLock;

use tracing::Level;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Installs the global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`. Calling this more than
/// once is a no-op.
pub fn init(default_level: Level) {
    INSTALLED.get_or_init(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(default_level).into())
            .from_env_lossy();

        let subscriber = tracing_subscriber::fmt()
            // Use a more compact, abbreviated log format
            .compact()
            .with_env_filter(filter)
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();

        // Another subscriber may already be installed by an embedding
        // application; keep theirs.
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Parses a level name such as `info` or `DEBUG`, falling back to `INFO`
pub fn parse_level(level: &str) -> Level { level.parse().unwrap_or(Level::INFO) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("WARN"), Level::WARN);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(Level::DEBUG);
        init(Level::TRACE);
        tracing::info!("logging initialized");
    }
}
