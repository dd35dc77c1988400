use std::process::ExitCode;

use clap::Parser;
use mapleds::{cli, i18n, logger};

fn main() -> ExitCode {
    // Initialize session log (overwrites previous session log)
    logger::init();

    // Embedded translations; the CLI picks the language from settings/flags
    i18n::init();

    let args = cli::CliArgs::parse();
    cli::run(args)
}
