//! ROM validation pipeline: list files, resolve platforms, load DATs,
//! identify by hash, and rename to canonical names.

pub mod engine;
pub mod error;
pub mod hasher;
pub mod listing;
pub mod loader;
pub mod rename;
pub mod report;
pub mod resolver;
pub mod settings;
pub mod validate;

pub use engine::{EncryptionAdvisory, IdentificationEngine, Verdict, hash_order};
pub use error::ValidateError;
pub use listing::{FileEntry, list_files};
pub use loader::{LoadReport, LoadedDat, load_index};
pub use rename::RenameProposal;
pub use report::{RunTally, write_unknown_report};
pub use resolver::{PlatformResolver, PlatformSet, Resolution, ScanResult};
pub use validate::{ValidateEvent, ValidateOptions, Validator};
