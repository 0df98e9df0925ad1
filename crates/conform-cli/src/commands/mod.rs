pub mod hooks;
pub mod init;
pub mod rules;
pub mod schema;
pub mod validate;

use std::path::PathBuf;

use crate::error::CliError;

/// The directory commands run against.
pub(crate) fn current_dir() -> Result<PathBuf, CliError> {
    std::env::current_dir().map_err(|e| CliError::io(".", e))
}
