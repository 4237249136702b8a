use romval_core::PlatformConfig;
use romval_dat::{DatProvider, HashIndex, MergeStats, parse_dat};

use crate::resolver::PlatformSet;

/// Per-DAT outcome of [`load_index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDat {
    pub platform: String,
    pub label: String,
    pub entries: usize,
    pub issues: usize,
    pub merge: MergeStats,
}

/// Everything [`load_index`] did.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<LoadedDat>,
    /// Platforms whose DATs could not be obtained at all.
    pub failed: Vec<String>,
}

/// Build one index from the DATs of every platform in `platforms`.
///
/// Platforms are merged in set order, primary DAT before supplements, so on
/// a hash collision the later DAT wins. Missing DATs are logged and
/// skipped; an empty result is left for the caller to reject.
pub fn load_index(
    config: &PlatformConfig,
    platforms: &PlatformSet,
    provider: &dyn DatProvider,
) -> (HashIndex, LoadReport) {
    let mut index = HashIndex::new();
    let mut report = LoadReport::default();

    for id in platforms.iter() {
        let Some(spec) = config.platform(id.as_str()) else {
            log::warn!("No configuration for platform {id}");
            report.failed.push(id.to_string());
            continue;
        };

        let dats = match provider.fetch(spec) {
            Ok(dats) => dats,
            Err(e) => {
                log::warn!("Could not load DAT for {id}: {e}");
                report.failed.push(id.to_string());
                continue;
            }
        };

        for dat in dats {
            let parsed = parse_dat(&dat.bytes);
            for issue in &parsed.issues {
                log::debug!("{}: {issue}", dat.label);
            }
            if !parsed.issues.is_empty() {
                log::warn!(
                    "{}: skipped {} malformed record(s)",
                    dat.label,
                    parsed.issues.len()
                );
            }
            let merge = index.merge(&parsed.entries);
            log::info!("Loaded {} entries from {}", parsed.entries.len(), dat.label);
            report.loaded.push(LoadedDat {
                platform: id.to_string(),
                label: dat.label,
                entries: parsed.entries.len(),
                issues: parsed.issues.len(),
                merge,
            });
        }
    }

    (index, report)
}
