// ttsclean/src/logger.rs
//! Logger setup for the ttsclean binary.
//!
//! Logs go to stderr so that stdout only ever carries sanitized text (or
//! JSON). `RUST_LOG` is honoured unless an explicit level is requested.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes `env_logger`. `level` overrides `RUST_LOG` when given.
/// Calling this more than once is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder
        .target(Target::Stderr)
        .format_timestamp(None)
        .try_init()
        .ok();
}

/// Maps the global `-q`/`-d` flags to a level override.
pub fn level_for(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}
