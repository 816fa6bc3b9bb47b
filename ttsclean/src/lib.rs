// ttsclean/src/lib.rs
//! # ttsclean CLI Application
//!
//! This crate provides the command-line interface for the `ttsclean-core`
//! sanitization pipeline: argument parsing, configuration file discovery,
//! logging setup, and the `sanitize`, `rules` and `settings` commands.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
