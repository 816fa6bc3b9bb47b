// ttsclean/src/main.rs
//! ttsclean entry point.
//!
//! Parses arguments, initializes logging and dispatches to the subcommand.

use anyhow::Result;
use clap::Parser;
use is_terminal::IsTerminal;
use std::io;

use ttsclean::cli::{Cli, Commands};
use ttsclean::commands::{rules, sanitize};
use ttsclean::logger;
use ttsclean::ui::output_format;

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Sanitize(cmd) => sanitize::run_sanitize(cmd),
        Commands::Rules(cmd) => rules::run_rules(cmd),
        Commands::Settings(cmd) => rules::run_settings(cmd),
    }
}

fn main() {
    let cli = Cli::parse();
    logger::init_logger(logger::level_for(cli.quiet, cli.debug));

    if let Err(e) = run(cli) {
        let stderr = io::stderr();
        let supports_color = stderr.is_terminal();
        let _ = output_format::print_error_message(&mut stderr.lock(), &format!("{:#}", e), supports_color);
        std::process::exit(1);
    }
}
