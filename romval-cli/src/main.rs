//! romval CLI
//!
//! Identify ROM files by content hash against No-Intro and Redump DATs and
//! optionally rename them to their canonical names.

mod cli_types;
mod commands;
mod error;
mod logging;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::Cli;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    if let Err(e) = commands::validate::run_validate(&cli) {
        log::error!("{}", e.if_supports_color(Stdout, |t| t.bold()));
        std::process::exit(1);
    }
}
