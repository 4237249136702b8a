use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Extension of save files that follow their ROM's name.
const SAVE_EXTENSION: &str = "sav";

/// What renaming a file or folder to its canonical name would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameProposal {
    /// Already carries the canonical name.
    Unchanged,
    /// Something already exists at the target; nothing is touched.
    Conflict { source: PathBuf, target: PathBuf },
    Rename { source: PathBuf, target: PathBuf },
}

impl RenameProposal {
    fn between(source: &Path, target: PathBuf) -> Self {
        if target == source {
            RenameProposal::Unchanged
        } else if target.exists() {
            RenameProposal::Conflict {
                source: source.to_path_buf(),
                target,
            }
        } else {
            RenameProposal::Rename {
                source: source.to_path_buf(),
                target,
            }
        }
    }
}

/// Last path component of `name`, so a DAT name can never move a file
/// out of its directory.
fn sanitized(name: &str) -> Option<&std::ffi::OsStr> {
    Path::new(name).file_name()
}

/// Rename `path` in place to `rom_name`.
pub fn propose_file_rename(path: &Path, rom_name: &str) -> RenameProposal {
    let Some(name) = sanitized(rom_name) else {
        return RenameProposal::Unchanged;
    };
    let parent = path.parent().unwrap_or(Path::new("."));
    RenameProposal::between(path, parent.join(name))
}

/// Rename `folder` to `folder_name`, keeping it in the same parent.
pub fn propose_folder_rename(folder: &Path, folder_name: &str) -> RenameProposal {
    let Some(name) = sanitized(folder_name) else {
        return RenameProposal::Unchanged;
    };
    let Some(parent) = folder.parent() else {
        return RenameProposal::Unchanged;
    };
    RenameProposal::between(folder, parent.join(name))
}

/// Carry out a proposal. Returns whether anything moved.
///
/// The target is checked again right before moving, so a path created
/// since the proposal was made is never overwritten.
pub fn apply(proposal: &RenameProposal) -> io::Result<bool> {
    let RenameProposal::Rename { source, target } = proposal else {
        return Ok(false);
    };
    if target.exists() {
        log::warn!("Target already exists: {}", target.display());
        return Ok(false);
    }
    fs::rename(source, target)?;
    Ok(true)
}

/// Save files named after `rom_path` (`<stem>.sav`, anywhere under the
/// ROM's directory) paired with their new name for `new_rom_name`.
pub fn save_companions(rom_path: &Path, new_rom_name: &str) -> Vec<(PathBuf, PathBuf)> {
    let (Some(old_stem), Some(new_stem)) = (
        rom_path.file_stem(),
        sanitized(new_rom_name).and_then(|n| Path::new(n).file_stem()),
    ) else {
        return Vec::new();
    };
    if old_stem == new_stem {
        return Vec::new();
    }
    let Some(dir) = rom_path.parent() else {
        return Vec::new();
    };

    let mut old_name = old_stem.to_os_string();
    old_name.push(".");
    old_name.push(SAVE_EXTENSION);
    let mut new_name = new_stem.to_os_string();
    new_name.push(".");
    new_name.push(SAVE_EXTENSION);

    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .filter(|e| e.file_type().is_file() && e.file_name() == old_name.as_os_str())
        .map(|e| {
            let source = e.into_path();
            let target = source.with_file_name(&new_name);
            (source, target)
        })
        .collect()
}

/// Rename every save companion of `rom_path`, skipping any whose target
/// exists. Returns the pairs that were (or, on a dry run, would be) renamed.
pub fn rename_saves(rom_path: &Path, new_rom_name: &str, dry_run: bool) -> Vec<(PathBuf, PathBuf)> {
    let mut renamed = Vec::new();
    for (source, target) in save_companions(rom_path, new_rom_name) {
        let proposal = RenameProposal::between(&source, target.clone());
        if !matches!(proposal, RenameProposal::Rename { .. }) {
            log::debug!("Not renaming save {}: target exists", source.display());
            continue;
        }
        if !dry_run {
            match apply(&proposal) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    log::warn!("Failed to rename {}: {e}", source.display());
                    continue;
                }
            }
        }
        renamed.push((source, target));
    }
    renamed
}

#[cfg(test)]
#[path = "tests/rename_tests.rs"]
mod tests;
