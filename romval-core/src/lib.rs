//! Core types shared by every romval crate: platform identifiers, the
//! extension/alias tables, and hash kinds.
//!
//! Nothing in this crate touches the file system or the network.

pub mod config;
pub mod error;
pub mod hash;
pub mod platform;

pub use config::{DatLocation, PlatformConfig, PlatformSpec};
pub use error::ConfigError;
pub use hash::{HashKind, normalize_hash};
pub use platform::{DatSource, ExtensionTarget, PlatformId, extension_of, normalize_folder_name};
