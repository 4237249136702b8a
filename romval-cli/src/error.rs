use std::path::PathBuf;

use romval_core::ConfigError;
use romval_lib::ValidateError;
use thiserror::Error;

/// Errors that end a `romval` run with exit code 1.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("ROM directory does not exist: {}", .0.display())]
    MissingRomDir(PathBuf),

    /// The directory holds nothing with a recognised extension.
    #[error("No ROM files found in {}", .0.display())]
    NoRomFiles(PathBuf),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validate(#[from] ValidateError),
}
