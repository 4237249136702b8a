//! One pass over the collected files: identify each, then rename it (or its
//! folder) to the canonical DAT name when asked to.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use romval_core::{PlatformConfig, extension_of};

use crate::engine::{IdentificationEngine, Verdict};
use crate::listing::FileEntry;
use crate::rename::{self, RenameProposal};
use crate::report::RunTally;

/// Options controlling a validation run.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Rename matched files to their canonical names.
    pub rename: bool,
    /// Report renames without touching the file system.
    pub dry_run: bool,
    /// Files larger than this many bytes are not hashed.
    pub skip_larger_than: Option<u64>,
}

impl ValidateOptions {
    fn proposes_renames(&self) -> bool {
        self.rename || self.dry_run
    }

    fn applies_renames(&self) -> bool {
        self.rename && !self.dry_run
    }
}

/// Everything observable that happens during a run, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidateEvent {
    Skipped {
        path: PathBuf,
        size: u64,
    },
    Identified {
        path: PathBuf,
        verdict: Verdict,
    },
    /// `applied` is false on a dry run.
    Renamed {
        source: PathBuf,
        target: PathBuf,
        applied: bool,
        folder: bool,
    },
    RenameConflict {
        source: PathBuf,
        target: PathBuf,
    },
    RenameFailed {
        source: PathBuf,
        target: PathBuf,
        error: String,
    },
    SaveRenamed {
        source: PathBuf,
        target: PathBuf,
        applied: bool,
    },
}

/// Drives identification and renaming for a list of files.
pub struct Validator<'a> {
    engine: &'a IdentificationEngine<'a>,
    config: &'a PlatformConfig,
    options: ValidateOptions,
}

/// `path` with its nearest renamed ancestor folder replaced by the new name.
fn relocate(path: &Path, moved: &HashMap<PathBuf, PathBuf>) -> PathBuf {
    for ancestor in path.ancestors().skip(1) {
        if let Some(new_folder) = moved.get(ancestor) {
            if let Ok(rest) = path.strip_prefix(ancestor) {
                return new_folder.join(rest);
            }
        }
    }
    path.to_path_buf()
}

impl<'a> Validator<'a> {
    pub fn new(
        engine: &'a IdentificationEngine<'a>,
        config: &'a PlatformConfig,
        options: ValidateOptions,
    ) -> Self {
        Self {
            engine,
            config,
            options,
        }
    }

    /// Process `files` in order, reporting each event to `on_event`.
    ///
    /// Files sharing a folder-named parent produce at most one folder
    /// proposal; once a folder moves, later files are read from its new
    /// location.
    pub fn run(&self, files: &[FileEntry], on_event: &mut dyn FnMut(&ValidateEvent)) -> RunTally {
        let mut tally = RunTally::default();
        let mut emit = |event: ValidateEvent| {
            tally.record(&event);
            on_event(&event);
        };

        let mut moved_folders: HashMap<PathBuf, PathBuf> = HashMap::new();
        let mut proposed_folders: HashSet<PathBuf> = HashSet::new();

        for file in files {
            if let Some(limit) = self.options.skip_larger_than {
                if file.size > limit {
                    emit(ValidateEvent::Skipped {
                        path: file.path.clone(),
                        size: file.size,
                    });
                    continue;
                }
            }

            let path = relocate(&file.path, &moved_folders);
            let verdict = self.engine.identify_sized(&path, file.size);
            emit(ValidateEvent::Identified {
                path: path.clone(),
                verdict: verdict.clone(),
            });

            if !self.options.proposes_renames() {
                continue;
            }
            let Verdict::Matched { rom_name, .. } = &verdict else {
                continue;
            };

            let folder_named = extension_of(&path).is_some_and(|ext| self.config.is_folder_named(&ext));
            if folder_named {
                let Some(folder) = path.parent().map(Path::to_path_buf) else {
                    continue;
                };
                if !proposed_folders.insert(folder.clone()) {
                    continue;
                }
                let Some(name) = verdict.folder_name() else {
                    continue;
                };
                let proposal = rename::propose_folder_rename(&folder, &name);
                if let Some((source, target)) = self.settle(proposal, true, &mut emit) {
                    if self.options.applies_renames() {
                        proposed_folders.insert(target.clone());
                        moved_folders.insert(source, target);
                    }
                }
            } else {
                let proposal = rename::propose_file_rename(&path, rom_name);
                if self.settle(proposal, false, &mut emit).is_some() {
                    for (source, target) in rename::rename_saves(&path, rom_name, self.options.dry_run) {
                        emit(ValidateEvent::SaveRenamed {
                            source,
                            target,
                            applied: !self.options.dry_run,
                        });
                    }
                }
            }
        }

        tally
    }

    /// Apply (or on a dry run, just report) a proposal. Returns the moved
    /// pair when the rename went through.
    fn settle(
        &self,
        proposal: RenameProposal,
        folder: bool,
        emit: &mut impl FnMut(ValidateEvent),
    ) -> Option<(PathBuf, PathBuf)> {
        match proposal {
            RenameProposal::Unchanged => None,
            RenameProposal::Conflict { source, target } => {
                emit(ValidateEvent::RenameConflict { source, target });
                None
            }
            RenameProposal::Rename { source, target } => {
                let applied = self.options.applies_renames();
                if applied {
                    let attempt = RenameProposal::Rename {
                        source: source.clone(),
                        target: target.clone(),
                    };
                    match rename::apply(&attempt) {
                        Ok(true) => {}
                        Ok(false) => {
                            emit(ValidateEvent::RenameConflict { source, target });
                            return None;
                        }
                        Err(e) => {
                            emit(ValidateEvent::RenameFailed {
                                source,
                                target,
                                error: e.to_string(),
                            });
                            return None;
                        }
                    }
                }
                emit(ValidateEvent::Renamed {
                    source: source.clone(),
                    target: target.clone(),
                    applied,
                    folder,
                });
                Some((source, target))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/validate_tests.rs"]
mod tests;
