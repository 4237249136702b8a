//! CLI type definitions.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "romval")]
#[command(about = "Validate ROMs against No-Intro and Redump DATs by hash", long_about = None)]
pub(crate) struct Cli {
    /// Directory containing the ROMs to validate
    #[arg(long)]
    pub romdir: PathBuf,

    /// Directory where DAT files are cached (default: ./dats)
    #[arg(long)]
    pub datdir: Option<PathBuf>,

    /// Rename matched files to their canonical DAT names
    #[arg(long)]
    pub rename: bool,

    /// Show planned renames without executing them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Skip files larger than this many megabytes
    #[arg(long, value_name = "MB")]
    pub skip_large: Option<u64>,

    /// Platform table to use instead of the built-in one (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Where to write the list of unmatched files (default: unknown.txt)
    #[arg(long)]
    pub unknown_report: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show every file result plus debug messages (with timestamps)
    #[arg(short, long)]
    pub verbose: bool,
}

const MIB: u64 = 1024 * 1024;

impl Cli {
    /// `--skip-large` in bytes. Zero disables the limit.
    pub(crate) fn skip_larger_than(&self) -> Option<u64> {
        self.skip_large
            .filter(|mb| *mb > 0)
            .map(|mb| mb.saturating_mul(MIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn romdir_is_required() {
        assert!(Cli::try_parse_from(["romval"]).is_err());
    }

    #[test]
    fn skip_large_is_megabytes() {
        let cli = Cli::try_parse_from(["romval", "--romdir", "roms", "--skip-large", "2"]).unwrap();
        assert_eq!(cli.skip_larger_than(), Some(2 * 1024 * 1024));

        let cli = Cli::try_parse_from(["romval", "--romdir", "roms", "--skip-large", "0"]).unwrap();
        assert_eq!(cli.skip_larger_than(), None);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["romval", "--romdir", "r", "--quiet", "-v"]).is_err());
    }
}
