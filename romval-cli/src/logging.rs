//! `env_logger` setup for the terminal.
//!
//! Info and debug records print as bare lines since they carry the tool's
//! normal output. Warnings and errors get a coloured prefix. While a
//! progress bar is attached, every record is written with the bar
//! suspended, including records from the library crates.

use std::io::Write;
use std::sync::Mutex;

use indicatif::ProgressBar;
use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn active_bar() -> Option<ProgressBar> {
    ACTIVE_BAR.lock().ok().and_then(|slot| slot.clone())
}

fn set_active_bar(pb: Option<ProgressBar>) {
    if let Ok(mut slot) = ACTIVE_BAR.lock() {
        *slot = pb;
    }
}

/// Keeps log output clear of a progress bar until dropped.
pub(crate) struct ProgressGuard(());

impl Drop for ProgressGuard {
    fn drop(&mut self) {
        set_active_bar(None);
    }
}

pub(crate) fn attach_progress(pb: &ProgressBar) -> ProgressGuard {
    set_active_bar(Some(pb.clone()));
    ProgressGuard(())
}

struct SuspendingLogger {
    inner: env_logger::Logger,
}

impl Log for SuspendingLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if !self.inner.matches(record) {
            return;
        }
        match active_bar() {
            Some(pb) => pb.suspend(|| self.inner.log(record)),
            None => self.inner.log(record),
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Level for our own crates. `RUST_LOG` can still override it.
fn level_for(verbose: bool, quiet: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

pub(crate) fn init(verbose: bool, quiet: bool) {
    let inner = env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("romval", level_for(verbose, quiet))
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(move |buf, record| {
            if verbose {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            match record.level() {
                Level::Error => writeln!(
                    buf,
                    "{} {}",
                    "error:".if_supports_color(Stdout, |t| t.red()),
                    record.args()
                ),
                Level::Warn => writeln!(
                    buf,
                    "{} {}",
                    "warning:".if_supports_color(Stdout, |t| t.yellow()),
                    record.args()
                ),
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .build();

    let max_level = inner.filter();
    if log::set_boxed_logger(Box::new(SuspendingLogger { inner })).is_ok() {
        log::set_max_level(max_level);
    }
}
