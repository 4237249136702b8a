use std::fmt;

use serde::{Deserialize, Serialize};

/// Hash algorithms a DAT entry can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashKind {
    Sha1,
    Md5,
    Crc32,
}

impl HashKind {
    pub const ALL: [HashKind; 3] = [HashKind::Sha1, HashKind::Md5, HashKind::Crc32];

    /// Length of the hex digest.
    pub fn hex_len(self) -> usize {
        match self {
            HashKind::Sha1 => 40,
            HashKind::Md5 => 32,
            HashKind::Crc32 => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HashKind::Sha1 => "sha1",
            HashKind::Md5 => "md5",
            HashKind::Crc32 => "crc32",
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Canonical form of a hex digest: trimmed, lowercase, exactly
/// [`HashKind::hex_len`] hex digits. Anything else yields `None`.
pub fn normalize_hash(kind: HashKind, raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.len() == kind.hex_len() && trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
        Some(trimmed.to_ascii_lowercase())
    } else {
        None
    }
}
