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

use std::path::PathBuf;

use snafu::{ResultExt, Snafu};
use tracing::debug;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum EnvError {
    #[snafu(display("Failed to load environment file: {source}"))]
    Dotenv { source: dotenvy::Error },
}

/// Loads variables from a `.env` file found in the current directory or
/// any parent.
///
/// Variables that are already set win over the file. A missing file is not
/// an error; `Ok(None)` is returned instead.
pub fn load_dotenv() -> Result<Option<PathBuf>, EnvError> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!("Loaded environment from {}", path.display());
            Ok(Some(path))
        }
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err).context(DotenvSnafu),
    }
}
