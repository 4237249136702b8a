use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romval_core::PlatformConfig;
use romval_dat::DatCache;
use romval_lib::settings::load_settings;
use romval_lib::{
    IdentificationEngine, PlatformResolver, RunTally, ValidateEvent, ValidateOptions, Validator,
    Verdict, list_files, load_index, write_unknown_report,
};

use crate::cli_types::Cli;
use crate::error::CliError;
use crate::logging;

const DEFAULT_DAT_DIR: &str = "dats";
const DEFAULT_UNKNOWN_REPORT: &str = "unknown.txt";
const NO_INTRO_DOWNLOADS: &str = "https://datomatic.no-intro.org/index.php?page=download";

fn megabytes(bytes: u64) -> String {
    format!("{:.1}MB", bytes as f64 / (1024.0 * 1024.0))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub(crate) fn run_validate(cli: &Cli) -> Result<(), CliError> {
    let settings = load_settings();
    let dat_dir = cli
        .datdir
        .clone()
        .or(settings.dat_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DAT_DIR));
    let report_path = cli
        .unknown_report
        .clone()
        .or(settings.unknown_report)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_UNKNOWN_REPORT));
    let config = match cli.config.clone().or(settings.config) {
        Some(path) => {
            log::debug!("Using platform table {}", path.display());
            PlatformConfig::load(&path)?
        }
        None => PlatformConfig::default(),
    };

    if !cli.romdir.is_dir() {
        return Err(CliError::MissingRomDir(cli.romdir.clone()));
    }
    // Resolve "." and friends so the root folder name can hint a platform.
    let romdir = cli.romdir.canonicalize()?;
    fs::create_dir_all(&dat_dir)?;

    log::info!(
        "Scanning ROMs in: {}",
        romdir.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    if cli.dry_run {
        log::info!(
            "{}",
            "Dry run: no files will be renamed".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let resolver = PlatformResolver::new(config);
    let listing = list_files(&romdir)?;
    let scan = resolver.scan(&romdir, &listing);
    if scan.files.is_empty() {
        return Err(CliError::NoRomFiles(romdir));
    }

    let total: u64 = scan.files.iter().map(|f| f.size).sum();
    log::info!(
        "Found {} ROM files, total data to process: {}",
        scan.files.len(),
        megabytes(total).if_supports_color(Stdout, |t| t.bold()),
    );
    let platforms: Vec<&str> = scan.platforms.iter().map(|id| id.as_str()).collect();
    log::debug!("Platforms needed: {}", platforms.join(", "));

    let cache = DatCache::new(&dat_dir);
    let (index, load) = load_index(resolver.config(), &scan.platforms, &cache);
    for platform in &load.failed {
        log::warn!("No DAT loaded for {platform}");
    }
    let engine = IdentificationEngine::new(&index)?
        .with_encryption_prone(resolver.config().encryption_prone.iter().cloned());
    log::info!(
        "Indexed {} hashes from {} DAT(s)",
        index.total_len(),
        load.loaded.len()
    );
    log::info!("");

    let options = ValidateOptions {
        rename: cli.rename,
        dry_run: cli.dry_run,
        skip_larger_than: cli.skip_larger_than(),
    };

    let pb = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(scan.files.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} [{pos}/{len}] {wide_msg}")
                .expect("static pattern")
                .tick_chars("/-\\|"),
        );
        pb
    };

    let validator = Validator::new(&engine, resolver.config(), options);
    let attached = logging::attach_progress(&pb);
    let tally = validator.run(&scan.files, &mut |event: &ValidateEvent| {
        print_event(event);
        if let ValidateEvent::Skipped { path, .. } | ValidateEvent::Identified { path, .. } = event
        {
            pb.set_message(file_name(path));
            pb.inc(1);
        }
    });
    drop(attached);
    pb.finish_and_clear();

    write_unknown_report(&report_path, &tally.unknown)?;
    if tally.unknown.is_empty() {
        log::info!("No unknown files. Cleared {}.", report_path.display());
    } else {
        log::info!("Unknown files written to: {}", report_path.display());
    }

    print_summary(&tally, cli.dry_run);
    if let Some(advisory) = engine.encryption_advisory(&tally.unknown) {
        print_advisory(advisory.files.len(), resolver.config());
    }
    Ok(())
}

fn print_event(event: &ValidateEvent) {
    match event {
        ValidateEvent::Skipped { path, size } => log::debug!(
            "{} Skipping large file: {} ({})",
            "\u{23ED}".if_supports_color(Stdout, |t| t.dimmed()),
            file_name(path),
            megabytes(*size),
        ),
        ValidateEvent::Identified {
            path,
            verdict: Verdict::Matched {
                game_description, ..
            },
        } => log::debug!(
            "{} {} -> {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            file_name(path),
            game_description,
        ),
        ValidateEvent::Identified {
            path,
            verdict: Verdict::Unknown,
        } => log::debug!(
            "{} {} -> {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            file_name(path),
            "Unknown".if_supports_color(Stdout, |t| t.dimmed()),
        ),
        ValidateEvent::Renamed {
            source,
            target,
            applied,
            folder,
        } => {
            let what = if *folder { "folder" } else { "file" };
            let verb = if *applied { "Renamed" } else { "Would rename" };
            log::info!(
                "  {} {what} {} -> {}",
                verb.if_supports_color(Stdout, |t| t.cyan()),
                file_name(source),
                file_name(target).if_supports_color(Stdout, |t| t.bold()),
            );
        }
        ValidateEvent::RenameConflict { source, target } => log::warn!(
            "Target already exists, not renaming {}: {}",
            file_name(source),
            target.display(),
        ),
        ValidateEvent::RenameFailed {
            source,
            target,
            error,
        } => log::warn!(
            "Failed to rename {} -> {}: {error}",
            source.display(),
            file_name(target),
        ),
        ValidateEvent::SaveRenamed {
            source,
            target,
            applied,
        } => {
            let verb = if *applied { "Renamed" } else { "Would rename" };
            log::info!(
                "  {} save {} -> {}",
                verb.if_supports_color(Stdout, |t| t.cyan()),
                file_name(source),
                file_name(target),
            );
        }
    }
}

fn print_summary(tally: &RunTally, dry_run: bool) {
    let action = if dry_run { "would be renamed" } else { "renamed" };

    log::info!("");
    log::info!(
        "Results: {} valid, {} unknown",
        tally.matched.if_supports_color(Stdout, |t| t.green()),
        tally.unknown_count().if_supports_color(Stdout, |t| t.red()),
    );
    if tally.skipped > 0 {
        log::info!("Skipped (too large): {}", tally.skipped);
    }
    if tally.renamed > 0 {
        log::info!("Files {action}: {}", tally.renamed);
    }
    if tally.saves_renamed > 0 {
        log::info!("Save files {action}: {}", tally.saves_renamed);
    }
    if tally.conflicts > 0 {
        log::warn!("{} rename(s) skipped: target already exists", tally.conflicts);
    }
    if tally.rename_errors > 0 {
        log::warn!("{} rename(s) failed", tally.rename_errors);
    }
}

fn print_advisory(count: usize, config: &PlatformConfig) {
    let extensions: Vec<String> = config
        .encryption_prone
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect();
    log::info!("");
    log::info!(
        "{} {count} {} file(s) didn't match.",
        "Note:".if_supports_color(Stdout, |t| t.yellow()),
        extensions.join("/"),
    );
    log::info!("These are often encrypted dumps, while the downloaded No-Intro DATs list decrypted ones.");
    log::info!("Your files may be valid: add the encrypted DATs to the DAT directory and run again.");
    log::info!(
        "Link: {}",
        NO_INTRO_DOWNLOADS.if_supports_color(Stdout, |t| t.cyan())
    );
}
