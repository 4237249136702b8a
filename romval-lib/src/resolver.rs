//! Decide which platform(s) each file belongs to, and therefore which DATs
//! must be loaded.

use std::collections::BTreeSet;
use std::path::Path;

use romval_core::{PlatformConfig, PlatformId, extension_of, normalize_folder_name};

use crate::listing::FileEntry;

/// Platform decision for one collected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one platform.
    Single(PlatformId),
    /// Ambiguous; every candidate's DAT is needed.
    AllOf(Vec<PlatformId>),
    /// A root hint is active and the file's candidates do not include it.
    /// The file is still validated, but contributes no platform.
    OutsideHint,
}

/// Platforms whose DATs must be loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformSet(BTreeSet<PlatformId>);

impl PlatformSet {
    pub fn insert(&mut self, id: PlatformId) -> bool {
        self.0.insert(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Extend<PlatformId> for PlatformSet {
    fn extend<T: IntoIterator<Item = PlatformId>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

/// Output of [`PlatformResolver::scan`].
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub hint: Option<PlatformId>,
    /// Files with a recognized, non-excluded extension, in listing order.
    pub files: Vec<FileEntry>,
    pub platforms: PlatformSet,
}

/// Resolves files to platforms using a [`PlatformConfig`].
#[derive(Debug, Clone)]
pub struct PlatformResolver {
    config: PlatformConfig,
}

impl PlatformResolver {
    pub fn new(config: PlatformConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// First platform, in configuration order, with an explicit alias
    /// occurring in the root folder name.
    pub fn root_hint(&self, root_name: &str) -> Option<PlatformId> {
        let folder = normalize_folder_name(root_name);
        if folder.is_empty() {
            return None;
        }
        self.config
            .platforms
            .iter()
            .find(|spec| spec.alias_in(&folder))
            .map(|spec| spec.id.clone())
    }

    /// Platform decision for one file, or `None` when the extension is
    /// unrecognized or excluded.
    pub fn resolve_platform(&self, path: &Path, hint: Option<&PlatformId>) -> Option<Resolution> {
        let ext = extension_of(path)?;
        if self.config.is_excluded(&ext) {
            return None;
        }
        let target = self.config.extension_target(&ext)?;
        let candidates = target.candidates();

        if let Some(hint) = hint {
            return Some(if candidates.contains(hint) {
                Resolution::Single(hint.clone())
            } else {
                Resolution::OutsideHint
            });
        }

        if !target.is_ambiguous() {
            return candidates.first().cloned().map(Resolution::Single);
        }

        let folder = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .map(normalize_folder_name)
            .unwrap_or_default();

        let by_folder = candidates
            .iter()
            .find(|id| !folder.is_empty() && self.config.folder_matches(id, &folder));

        Some(match by_folder {
            Some(id) => Resolution::Single(id.clone()),
            None => Resolution::AllOf(candidates.to_vec()),
        })
    }

    /// Collect recognized files under `root` and the platform set their
    /// validation needs.
    pub fn scan(&self, root: &Path, listing: &[FileEntry]) -> ScanResult {
        let hint = root
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| self.root_hint(n));
        if let Some(ref id) = hint {
            log::info!("Inferring single platform from folder name: {id}");
        }

        let mut result = ScanResult {
            hint: hint.clone(),
            ..Default::default()
        };

        for entry in listing {
            let Some(resolution) = self.resolve_platform(&entry.path, hint.as_ref()) else {
                continue;
            };
            log::trace!("{} -> {resolution:?}", entry.path.display());
            match resolution {
                Resolution::Single(id) => {
                    result.platforms.insert(id);
                }
                Resolution::AllOf(ids) => result.platforms.extend(ids),
                Resolution::OutsideHint => {}
            }
            result.files.push(entry.clone());
        }

        if let Some(id) = hint {
            if !result.files.is_empty() {
                result.platforms.insert(id);
            }
        }

        result
    }
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
