//! User settings file: `<config dir>/romval/settings.toml`.
//!
//! ```toml
//! dat_dir = "/home/me/dats"
//! config = "/home/me/platforms.toml"
//! unknown_report = "/home/me/unknown.txt"
//! ```
//!
//! Every key is optional; command-line flags take precedence.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ValidateError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where DATs are cached.
    pub dat_dir: Option<PathBuf>,
    /// Platform table override.
    pub config: Option<PathBuf>,
    /// Where the unknown-files list is written.
    pub unknown_report: Option<PathBuf>,
}

/// Canonical path to the settings file.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("romval").join("settings.toml")
}

/// Read settings from `path`. A missing file yields defaults.
pub fn load_settings_from(path: &Path) -> Result<Settings, ValidateError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&contents).map_err(|source| ValidateError::Settings {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the user's settings file, falling back to defaults when it is
/// unreadable.
pub fn load_settings() -> Settings {
    let path = settings_path();
    match load_settings_from(&path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Ignoring settings: {e}");
            Settings::default()
        }
    }
}
