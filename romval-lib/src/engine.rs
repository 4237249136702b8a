use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use romval_core::{HashKind, extension_of};
use romval_dat::HashIndex;

use crate::error::ValidateError;
use crate::hasher::{self, LARGE_FILE_THRESHOLD};

/// Order in which digests are tried for a file of `file_size` bytes.
///
/// Large files try the cheapest digest first; small files try the
/// strongest first.
pub fn hash_order(file_size: u64) -> [HashKind; 3] {
    if file_size > LARGE_FILE_THRESHOLD {
        [HashKind::Crc32, HashKind::Md5, HashKind::Sha1]
    } else {
        [HashKind::Sha1, HashKind::Md5, HashKind::Crc32]
    }
}

/// Outcome of identifying one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Matched {
        rom_name: String,
        game_description: String,
        matched_by: HashKind,
    },
    Unknown,
}

impl Verdict {
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Matched { .. })
    }

    /// Canonical folder name for a match: the ROM name without its final
    /// extension.
    pub fn folder_name(&self) -> Option<String> {
        match self {
            Verdict::Matched { rom_name, .. } => Some(
                Path::new(rom_name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| rom_name.clone()),
            ),
            Verdict::Unknown => None,
        }
    }
}

/// Unknown files whose extension is prone to encrypted dumps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionAdvisory {
    pub files: Vec<PathBuf>,
}

/// Identifies files against a loaded [`HashIndex`].
#[derive(Debug)]
pub struct IdentificationEngine<'a> {
    index: &'a HashIndex,
    encryption_prone: BTreeSet<String>,
}

impl<'a> IdentificationEngine<'a> {
    /// Refuses an empty index: every file would come back unknown.
    pub fn new(index: &'a HashIndex) -> Result<Self, ValidateError> {
        if index.is_empty() {
            return Err(ValidateError::NoDataLoaded);
        }
        Ok(Self {
            index,
            encryption_prone: BTreeSet::new(),
        })
    }

    /// Extensions (lowercase, no dot) whose misses warrant an advisory.
    pub fn with_encryption_prone<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.encryption_prone = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn index(&self) -> &HashIndex {
        self.index
    }

    /// Identify a file, reading its size from disk.
    pub fn identify(&self, path: &Path) -> Verdict {
        match std::fs::metadata(path) {
            Ok(meta) => self.identify_sized(path, meta.len()),
            Err(e) => {
                log::warn!("Cannot read {}: {e}", path.display());
                Verdict::Unknown
            }
        }
    }

    /// Identify a file whose size is already known.
    ///
    /// Digests are computed lazily in [`hash_order`]; the first one found in
    /// the index decides. A digest that fails to compute is skipped.
    pub fn identify_sized(&self, path: &Path, file_size: u64) -> Verdict {
        for kind in hash_order(file_size) {
            let digest = match hasher::hash_file_sized(path, kind, file_size) {
                Ok(digest) => digest,
                Err(e) => {
                    log::warn!("Failed to compute {kind} of {}: {e}", path.display());
                    continue;
                }
            };
            if let Some(hit) = self.index.lookup(kind, &digest) {
                log::debug!("{} matched by {kind} {digest}", path.display());
                return Verdict::Matched {
                    rom_name: hit.rom_name.clone(),
                    game_description: hit.game_description.clone(),
                    matched_by: kind,
                };
            }
        }
        Verdict::Unknown
    }

    pub fn is_encryption_prone(&self, path: &Path) -> bool {
        extension_of(path).is_some_and(|ext| self.encryption_prone.contains(&ext))
    }

    /// Advisory for the encryption-prone subset of `unknown`, if any.
    pub fn encryption_advisory(&self, unknown: &[PathBuf]) -> Option<EncryptionAdvisory> {
        let files: Vec<PathBuf> = unknown
            .iter()
            .filter(|path| self.is_encryption_prone(path))
            .cloned()
            .collect();
        (!files.is_empty()).then_some(EncryptionAdvisory { files })
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
