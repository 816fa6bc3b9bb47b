// ttsclean/src/cli.rs
//! This file defines the command-line interface (CLI) for the ttsclean application,
//! including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "ttsclean",
    version = env!("CARGO_PKG_VERSION"),
    about = "Turn flashcard markup into plain text for speech synthesis",
    long_about = "ttsclean runs note fields or rendered card sides through an ordered pipeline of named rules (cloze handling, markup stripping, sound tag removal, delimiter stripping, character substitutions) and prints the text a speech synthesizer should read.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging, including one trace line per sanitized input
    #[arg(long, short = 'd', global = true, conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `ttsclean` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sanitizes an input file or stdin for speech synthesis.
    #[command(about = "Sanitizes an input file or stdin for speech synthesis.")]
    Sanitize(SanitizeCommand),

    /// Lists the rule catalog, or the active rules of one pipeline.
    #[command(about = "Lists every rule, or the rules a pipeline runs with the current settings.")]
    Rules(RulesCommand),

    /// Prints the effective settings as JSON.
    #[command(about = "Prints the effective settings (defaults plus overrides) as JSON.")]
    Settings(SettingsCommand),
}

/// Where settings and pipelines come from. Shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// YAML settings file layered over the defaults.
    #[arg(
        long = "settings",
        value_name = "FILE",
        env = "TTSCLEAN_SETTINGS",
        help = "YAML settings file layered over the defaults (default: <config dir>/ttsclean/settings.yaml if present)."
    )]
    pub settings: Option<PathBuf>,

    /// YAML pipelines file merged over the stock pipelines.
    #[arg(long = "pipelines", value_name = "FILE", help = "YAML pipelines file merged over the stock pipelines.")]
    pub pipelines: Option<PathBuf>,

    /// Individual setting overrides, applied last.
    #[arg(
        long = "set",
        value_name = "KEY=VALUE",
        help = "Override one setting; VALUE is parsed as YAML (e.g. --set strip_note_parens=true). May be repeated."
    )]
    pub set: Vec<String>,
}

/// Arguments for the `sanitize` command.
#[derive(Parser, Debug)]
pub struct SanitizeCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write sanitized output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// The pipeline to run.
    #[arg(long, short = 'p', value_name = "NAME", default_value = "notes", help = "Name of the pipeline to run.")]
    pub pipeline: String,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Process input line by line (useful for streaming data from pipes).
    #[arg(long = "line-buffered", help = "Process input line by line (useful for streaming data from pipes).")]
    pub line_buffered: bool,

    /// Print each rule application to stderr.
    #[arg(long = "trace", help = "Print every rule application and its result to stderr.")]
    pub trace: bool,

    /// Emit the full transformation record as JSON.
    #[arg(long = "json", help = "Emit the full transformation record as JSON instead of plain text.")]
    pub json: bool,
}

/// Arguments for the `rules` command.
#[derive(Parser, Debug)]
pub struct RulesCommand {
    /// Show only the rules this pipeline would run.
    #[arg(long, short = 'p', value_name = "NAME", help = "Show the rules this pipeline runs with the effective settings.")]
    pub pipeline: Option<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `settings` command.
#[derive(Parser, Debug)]
pub struct SettingsCommand {
    #[command(flatten)]
    pub config: ConfigArgs,
}
