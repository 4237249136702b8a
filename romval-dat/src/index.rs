use std::collections::HashMap;

use romval_core::{HashKind, normalize_hash};

use crate::dat::DatEntry;

/// What a hash resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomMatch {
    pub rom_name: String,
    pub game_description: String,
}

/// Counts from one [`HashIndex::merge`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    /// Keys seen for the first time.
    pub inserted: usize,
    /// Keys already present whose value was replaced.
    pub overwritten: usize,
    /// Hashes refused because they were not canonical hex.
    pub rejected: usize,
}

impl MergeStats {
    fn absorb(&mut self, other: MergeStats) {
        self.inserted += other.inserted;
        self.overwritten += other.overwritten;
        self.rejected += other.rejected;
    }
}

/// Hash lookup tables built from any number of DATs.
///
/// One map per [`HashKind`], keyed by lowercase hex. When two entries share
/// a key, the one merged last wins.
#[derive(Debug, Default, Clone)]
pub struct HashIndex {
    by_sha1: HashMap<String, RomMatch>,
    by_md5: HashMap<String, RomMatch>,
    by_crc32: HashMap<String, RomMatch>,
}

impl HashIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a single batch of entries.
    pub fn from_entries(entries: &[DatEntry]) -> Self {
        let mut index = Self::new();
        index.merge(entries);
        index
    }

    fn table(&self, kind: HashKind) -> &HashMap<String, RomMatch> {
        match kind {
            HashKind::Sha1 => &self.by_sha1,
            HashKind::Md5 => &self.by_md5,
            HashKind::Crc32 => &self.by_crc32,
        }
    }

    fn table_mut(&mut self, kind: HashKind) -> &mut HashMap<String, RomMatch> {
        match kind {
            HashKind::Sha1 => &mut self.by_sha1,
            HashKind::Md5 => &mut self.by_md5,
            HashKind::Crc32 => &mut self.by_crc32,
        }
    }

    /// Insert every hash of every entry. Entries without hashes are ignored.
    pub fn merge(&mut self, entries: &[DatEntry]) -> MergeStats {
        let mut stats = MergeStats::default();
        for entry in entries {
            stats.absorb(self.insert(entry));
        }
        if stats.overwritten > 0 {
            log::debug!(
                "{} hash keys were already indexed and have been replaced",
                stats.overwritten
            );
        }
        stats
    }

    fn insert(&mut self, entry: &DatEntry) -> MergeStats {
        let mut stats = MergeStats::default();
        for kind in HashKind::ALL {
            let Some(raw) = entry.hash(kind) else {
                continue;
            };
            let Some(key) = normalize_hash(kind, raw) else {
                log::warn!("Skipping malformed {kind} '{raw}' for '{}'", entry.rom_name);
                stats.rejected += 1;
                continue;
            };
            let value = RomMatch {
                rom_name: entry.rom_name.clone(),
                game_description: entry.game_description.clone(),
            };
            match self.table_mut(kind).insert(key, value) {
                Some(_) => stats.overwritten += 1,
                None => stats.inserted += 1,
            }
        }
        stats
    }

    /// Exact lookup. The query is lowercased first.
    pub fn lookup(&self, kind: HashKind, hash: &str) -> Option<&RomMatch> {
        self.table(kind).get(&hash.trim().to_ascii_lowercase())
    }

    /// Number of keys for one kind.
    pub fn len(&self, kind: HashKind) -> usize {
        self.table(kind).len()
    }

    /// Keys across all kinds.
    pub fn total_len(&self) -> usize {
        HashKind::ALL.iter().map(|kind| self.len(*kind)).sum()
    }

    /// True when no kind has any key.
    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }
}

#[cfg(test)]
#[path = "tests/index_tests.rs"]
mod tests;
