use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::validate::ValidateEvent;

/// Running totals of a validation run. Every event passes through
/// [`RunTally::record`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunTally {
    pub matched: usize,
    pub unknown: Vec<PathBuf>,
    pub skipped: usize,
    /// Files or folders renamed, or that would be on a dry run.
    pub renamed: usize,
    pub saves_renamed: usize,
    pub conflicts: usize,
    pub rename_errors: usize,
}

impl RunTally {
    pub fn record(&mut self, event: &ValidateEvent) {
        match event {
            ValidateEvent::Skipped { .. } => self.skipped += 1,
            ValidateEvent::Identified { path, verdict } => {
                if verdict.is_match() {
                    self.matched += 1;
                } else {
                    self.unknown.push(path.clone());
                }
            }
            ValidateEvent::Renamed { .. } => self.renamed += 1,
            ValidateEvent::SaveRenamed { .. } => self.saves_renamed += 1,
            ValidateEvent::RenameConflict { .. } => self.conflicts += 1,
            ValidateEvent::RenameFailed { .. } => self.rename_errors += 1,
        }
    }

    pub fn unknown_count(&self) -> usize {
        self.unknown.len()
    }

    /// Files that were hashed.
    pub fn processed(&self) -> usize {
        self.matched + self.unknown.len()
    }
}

/// Write one unknown path per line, replacing any previous report. An
/// empty list leaves an empty file so stale entries never linger.
pub fn write_unknown_report(path: &Path, unknown: &[PathBuf]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut out = io::BufWriter::new(fs::File::create(path)?);
    for file in unknown {
        writeln!(out, "{}", file.display())?;
    }
    out.flush()
}
