use std::path::PathBuf;

use romval_core::ConfigError;
use romval_dat::DatError;
use thiserror::Error;

/// Errors that abort a validation run.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// No DAT contributed a single usable hash.
    #[error("No DAT entries loaded")]
    NoDataLoaded,

    #[error("ROM directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dat(#[from] DatError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid settings file {}: {source}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
