//! On-disk DAT cache.
//!
//! Each platform's primary DAT lives at `<dat_dir>/<platform id>.dat` and is
//! downloaded from the libretro-database mirror the first time it is needed.
//! Users may also drop extra Logiqx DATs into the same directory (for
//! example No-Intro's encrypted and decrypted DS sets); platforms flagged
//! `supplementary` pick those up by file name.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use romval_core::{PlatformId, PlatformSpec};

use crate::error::DatError;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// File-name markers of supplementary DATs.
const SUPPLEMENT_MARKERS: [&str; 2] = ["Encrypted", "Decrypted"];

/// Raw bytes of one DAT, labelled for log output.
#[derive(Debug, Clone)]
pub struct DatBytes {
    pub label: String,
    pub bytes: Vec<u8>,
}

/// Supplies the raw DATs for a platform.
pub trait DatProvider {
    /// All DATs for `platform`, primary first.
    fn fetch(&self, platform: &PlatformSpec) -> Result<Vec<DatBytes>, DatError>;
}

/// Cache path of a platform's primary DAT.
pub fn dat_file_path(dat_dir: &Path, platform: &PlatformId) -> PathBuf {
    dat_dir.join(format!("{platform}.dat"))
}

/// Return the cached primary DAT, downloading it first if missing.
pub fn ensure_dat(dat_dir: &Path, platform: &PlatformSpec) -> Result<PathBuf, DatError> {
    let path = dat_file_path(dat_dir, &platform.id);
    if path.is_file() {
        log::debug!("Using cached DAT {}", path.display());
        return Ok(path);
    }

    let location = platform
        .dat
        .as_ref()
        .ok_or_else(|| DatError::NoSource(platform.id.to_string()))?;
    let url = location.url();

    log::info!(
        "Downloading {} DAT for {}...",
        location.source.display_name(),
        platform.id
    );
    let client = reqwest::blocking::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()?;
    let response = client.get(&url).send()?;
    if !response.status().is_success() {
        return Err(DatError::download(format!(
            "HTTP {} for {} ({url})",
            response.status(),
            platform.id
        )));
    }
    let bytes = response.bytes()?;

    fs::create_dir_all(dat_dir)?;
    fs::write(&path, &bytes)?;
    log::debug!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

/// True for `*<platform>*<marker>*.dat`.
fn is_supplement(file_name: &str, platform: &str, marker: &str) -> bool {
    let Some(stem) = file_name.strip_suffix(".dat") else {
        return false;
    };
    stem.find(platform)
        .is_some_and(|at| stem[at + platform.len()..].contains(marker))
}

/// Supplementary DATs for `platform` found directly in `dat_dir`, encrypted
/// sets first, each group sorted by name.
pub fn supplementary_dats(dat_dir: &Path, platform: &PlatformId) -> Vec<PathBuf> {
    let names: Vec<String> = match fs::read_dir(dat_dir) {
        Ok(dir) => dir
            .flatten()
            .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect(),
        Err(_) => return Vec::new(),
    };

    let mut found = Vec::new();
    for marker in SUPPLEMENT_MARKERS {
        let mut group: Vec<&String> = names
            .iter()
            .filter(|name| is_supplement(name, platform.as_str(), marker))
            .collect();
        group.sort();
        found.extend(group.into_iter().map(|name| dat_dir.join(name)));
    }
    found
}

/// [`DatProvider`] backed by a local directory and the libretro mirror.
#[derive(Debug, Clone)]
pub struct DatCache {
    dir: PathBuf,
}

impl DatCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn read_labelled(path: &Path) -> Result<DatBytes, DatError> {
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(DatBytes {
        label,
        bytes: fs::read(path)?,
    })
}

impl DatProvider for DatCache {
    fn fetch(&self, platform: &PlatformSpec) -> Result<Vec<DatBytes>, DatError> {
        let mut dats = Vec::new();
        let primary = ensure_dat(&self.dir, platform).and_then(|path| read_labelled(&path));

        let supplements = if platform.supplementary {
            supplementary_dats(&self.dir, &platform.id)
        } else {
            Vec::new()
        };

        match primary {
            Ok(dat) => dats.push(dat),
            Err(e) if supplements.is_empty() => return Err(e),
            Err(e) => log::warn!("Could not load DAT for {}: {e}", platform.id),
        }

        for path in supplements {
            match read_labelled(&path) {
                Ok(dat) => {
                    log::info!("Loading supplementary DAT {}", dat.label);
                    dats.push(dat);
                }
                Err(e) => log::warn!("Could not read {}: {e}", path.display()),
            }
        }
        Ok(dats)
    }
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
