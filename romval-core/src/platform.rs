use std::borrow::Borrow;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Identifier of a platform whose reference DATs can be loaded, such as
/// `"Nintendo DS"` or `"PlayStation 2"`.
///
/// The identifier doubles as the DAT cache file stem, so it is kept exactly
/// as configured (case and spaces included).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformId(String);

impl PlatformId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlatformId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Borrow<str> for PlatformId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Platform candidates for one file extension.
///
/// Written in TOML as either a single platform (`gba = "Game Boy Advance"`)
/// or a list (`nds = ["Nintendo DS", "Nintendo DSi"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtensionTarget {
    Single(PlatformId),
    Multi(Vec<PlatformId>),
}

impl ExtensionTarget {
    /// Candidate platforms in declared order.
    pub fn candidates(&self) -> &[PlatformId] {
        match self {
            Self::Single(id) => std::slice::from_ref(id),
            Self::Multi(ids) => ids,
        }
    }

    /// True when the extension alone cannot decide the platform.
    pub fn is_ambiguous(&self) -> bool {
        self.candidates().len() > 1
    }
}

/// Where a platform's reference DAT is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatSource {
    /// No-Intro DATs (cartridge and handheld systems).
    NoIntro,
    /// Redump DATs (disc-based systems).
    Redump,
}

impl DatSource {
    /// Base URL of the libretro-database mirror for this source.
    pub fn base_url(&self) -> &'static str {
        match self {
            DatSource::NoIntro => {
                "https://raw.githubusercontent.com/libretro/libretro-database/master/metadat/no-intro/"
            }
            DatSource::Redump => {
                "https://raw.githubusercontent.com/libretro/libretro-database/master/metadat/redump/"
            }
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DatSource::NoIntro => "No-Intro",
            DatSource::Redump => "Redump",
        }
    }
}

/// Lowercase a folder name and strip its spaces, the form aliases are
/// matched against.
pub fn normalize_folder_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "")
}

/// Lowercased extension of `path` without the leading dot.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
