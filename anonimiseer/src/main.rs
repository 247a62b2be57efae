// anonimiseer/src/main.rs
//! Anonimiseer entry point.
//!
//! Parses the CLI, initializes logging and dispatches to the command
//! implementations. Errors land on stderr with a non-zero exit status.
//!
//! License: MIT OR APACHE 2.0

use clap::Parser;
use log::LevelFilter;

use anonimiseer::cli::Cli;
use anonimiseer::commands;
use anonimiseer::logger;

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug {
        Some(LevelFilter::Debug)
    } else if cli.quiet {
        Some(LevelFilter::Off)
    } else {
        None
    };
    logger::init_logger(level);

    if let Err(e) = commands::run(cli) {
        eprintln!("Fout: {e:#}");
        std::process::exit(1);
    }
}
