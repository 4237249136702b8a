use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ValidateError;

/// A regular file found under the ROM root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
}

/// Every regular file under `root`, recursively, in path order.
///
/// Unreadable entries are logged and skipped. Symlinks are not followed.
pub fn list_files(root: &Path) -> Result<Vec<FileEntry>, ValidateError> {
    if !root.is_dir() {
        return Err(ValidateError::RootNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.metadata() {
            Ok(meta) => files.push(FileEntry {
                path: entry.into_path(),
                size: meta.len(),
            }),
            Err(e) => log::warn!("Skipping {}: {e}", entry.path().display()),
        }
    }
    Ok(files)
}
