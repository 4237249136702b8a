//! Platform, extension and alias tables.
//!
//! The built-in tables cover the handheld and disc systems the libretro
//! mirror publishes DATs for. A TOML file with the same shape replaces them
//! wholesale:
//!
//! ```toml
//! encryption_prone = ["nds", "3ds"]
//! folder_named = ["bin"]
//! excluded = ["cue"]
//!
//! [[platforms]]
//! id = "Nintendo DS"
//! aliases = ["nds", "nintendods"]
//! supplementary = true
//! dat = { source = "no-intro", name = "Nintendo - Nintendo DS" }
//!
//! [extensions]
//! nds = ["Nintendo DS"]
//! ```

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::platform::{DatSource, ExtensionTarget, PlatformId, normalize_folder_name};

/// Published location of a platform's reference DAT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatLocation {
    pub source: DatSource,
    /// File stem on the mirror, e.g. `"Nintendo - Game Boy"`.
    pub name: String,
}

impl DatLocation {
    /// Download URL, with spaces percent-encoded.
    pub fn url(&self) -> String {
        let file = format!("{}.dat", self.name).replace(' ', "%20");
        format!("{}{}", self.source.base_url(), file)
    }
}

/// One platform entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub id: PlatformId,
    /// Folder-name fragments identifying this platform. Matched as
    /// substrings of the lowercased, space-stripped folder name.
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub dat: Option<DatLocation>,
    /// Also load user-supplied `*<id>*Encrypted*.dat` / `*<id>*Decrypted*.dat`
    /// files from the DAT directory.
    #[serde(default)]
    pub supplementary: bool,
}

impl PlatformSpec {
    fn new(id: &str, aliases: &[&str], source: DatSource, dat_name: &str) -> Self {
        Self {
            id: PlatformId::new(id),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            dat: Some(DatLocation {
                source,
                name: dat_name.to_string(),
            }),
            supplementary: false,
        }
    }

    fn with_supplementary(mut self) -> Self {
        self.supplementary = true;
        self
    }

    /// True when any explicit alias occurs in `folder` (already normalized).
    pub fn alias_in(&self, folder: &str) -> bool {
        self.aliases
            .iter()
            .any(|alias| folder.contains(&normalize_folder_name(alias)))
    }
}

/// The complete set of lookup tables driving platform resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Platforms in root-hint priority order.
    pub platforms: Vec<PlatformSpec>,
    /// Extension (lowercase, no dot) to candidate platforms.
    pub extensions: BTreeMap<String, ExtensionTarget>,
    /// Extensions whose dumps are often encrypted and miss against
    /// decrypted-hash DATs.
    #[serde(default)]
    pub encryption_prone: BTreeSet<String>,
    /// Extensions whose containing folder is renamed instead of the file.
    #[serde(default)]
    pub folder_named: BTreeSet<String>,
    /// Extensions never collected or hashed.
    #[serde(default)]
    pub excluded: BTreeSet<String>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        use DatSource::{NoIntro, Redump};

        let platforms = vec![
            PlatformSpec::new(
                "PlayStation",
                &["ps1", "psx", "playstation"],
                Redump,
                "Sony - PlayStation",
            ),
            PlatformSpec::new(
                "PlayStation 2",
                &["ps2", "playstation2"],
                Redump,
                "Sony - PlayStation 2",
            ),
            PlatformSpec::new("PSP", &["psp"], NoIntro, "Sony - PlayStation Portable"),
            PlatformSpec::new("Wii", &["wii"], Redump, "Nintendo - Wii"),
            PlatformSpec::new(
                "GameCube",
                &["gamecube", "gcm", "ciso"],
                Redump,
                "Nintendo - GameCube",
            ),
            PlatformSpec::new(
                "Nintendo DS",
                &["nds", "nintendods", "nintendo-ds"],
                NoIntro,
                "Nintendo - Nintendo DS",
            )
            .with_supplementary(),
            PlatformSpec::new(
                "Nintendo DSi",
                &["dsi", "nintendodsi"],
                NoIntro,
                "Nintendo - Nintendo DSi",
            ),
            PlatformSpec::new(
                "Nintendo DS Download Play",
                &["downloadplay", "ndsd", "dsdownload"],
                NoIntro,
                "Nintendo - Nintendo DS (Download Play)",
            ),
            PlatformSpec::new(
                "Nintendo 3DS",
                &["3ds", "nintendo3ds"],
                NoIntro,
                "Nintendo - Nintendo 3DS",
            )
            .with_supplementary(),
            PlatformSpec::new("Game Boy Advance", &[], NoIntro, "Nintendo - Game Boy Advance"),
            PlatformSpec::new("Game Boy", &[], NoIntro, "Nintendo - Game Boy"),
            PlatformSpec::new("Game Boy Color", &[], NoIntro, "Nintendo - Game Boy Color"),
        ];

        let single = |id: &str| ExtensionTarget::Single(PlatformId::new(id));
        let multi =
            |ids: &[&str]| ExtensionTarget::Multi(ids.iter().map(|id| PlatformId::new(*id)).collect());

        let extensions = BTreeMap::from([
            ("gba".to_string(), single("Game Boy Advance")),
            ("gb".to_string(), single("Game Boy")),
            ("gbc".to_string(), single("Game Boy Color")),
            (
                "nds".to_string(),
                multi(&["Nintendo DS", "Nintendo DS Download Play", "Nintendo DSi"]),
            ),
            ("3ds".to_string(), single("Nintendo 3DS")),
            (
                "iso".to_string(),
                multi(&["PSP", "PlayStation 2", "Wii"]),
            ),
            ("cso".to_string(), single("PSP")),
            ("pbp".to_string(), single("PSP")),
            ("gcm".to_string(), single("GameCube")),
            ("ciso".to_string(), single("GameCube")),
            ("wbfs".to_string(), single("Wii")),
            ("psx".to_string(), single("PlayStation")),
            ("bin".to_string(), multi(&["PlayStation", "PlayStation 2"])),
        ]);

        let set = |exts: &[&str]| exts.iter().map(|e| e.to_string()).collect::<BTreeSet<_>>();

        Self {
            platforms,
            extensions,
            encryption_prone: set(&["nds", "3ds"]),
            folder_named: set(&["bin"]),
            excluded: set(&["cue"]),
        }
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

impl PlatformConfig {
    /// Parse and validate a TOML table set.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: PlatformConfig = toml::from_str(text)?;
        let config = raw.normalized();
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn normalized(self) -> Self {
        let set = |exts: BTreeSet<String>| -> BTreeSet<String> {
            exts.iter().map(|e| normalize_extension(e)).collect()
        };
        Self {
            platforms: self.platforms,
            extensions: self
                .extensions
                .into_iter()
                .map(|(ext, target)| (normalize_extension(&ext), target))
                .collect(),
            encryption_prone: set(self.encryption_prone),
            folder_named: set(self.folder_named),
            excluded: set(self.excluded),
        }
    }

    /// Check that every extension candidate names a declared platform.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for spec in &self.platforms {
            if !seen.insert(spec.id.as_str()) {
                return Err(ConfigError::DuplicatePlatform(spec.id.to_string()));
            }
            if spec.aliases.iter().any(|a| normalize_folder_name(a).is_empty()) {
                return Err(ConfigError::EmptyAlias(spec.id.to_string()));
            }
        }

        for (ext, target) in &self.extensions {
            if target.candidates().is_empty() {
                return Err(ConfigError::NoCandidates(ext.clone()));
            }
            if let Some(missing) = target.candidates().iter().find(|id| !seen.contains(id.as_str())) {
                return Err(ConfigError::UnknownPlatform {
                    extension: ext.clone(),
                    platform: missing.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn platform(&self, id: &str) -> Option<&PlatformSpec> {
        self.platforms.iter().find(|p| p.id.as_str() == id)
    }

    /// Candidate platforms for an extension, with or without the dot.
    pub fn extension_target(&self, ext: &str) -> Option<&ExtensionTarget> {
        self.extensions.get(&normalize_extension(ext))
    }

    pub fn is_excluded(&self, ext: &str) -> bool {
        self.excluded.contains(&normalize_extension(ext))
    }

    pub fn is_encryption_prone(&self, ext: &str) -> bool {
        self.encryption_prone.contains(&normalize_extension(ext))
    }

    pub fn is_folder_named(&self, ext: &str) -> bool {
        self.folder_named.contains(&normalize_extension(ext))
    }

    /// Does `folder` (already normalized) name platform `id`?
    ///
    /// Platforms without explicit aliases fall back to their normalized id.
    pub fn folder_matches(&self, id: &PlatformId, folder: &str) -> bool {
        match self.platform(id.as_str()) {
            Some(spec) if !spec.aliases.is_empty() => spec.alias_in(folder),
            _ => folder.contains(&normalize_folder_name(id.as_str())),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
