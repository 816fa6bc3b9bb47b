// ttsclean/src/commands/mod.rs
//! Subcommand implementations and the configuration loading they share.

pub mod rules;
pub mod sanitize;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

use ttsclean_core::{merge_settings, ConfigValue, PipelineConfig, Settings};

use crate::cli::ConfigArgs;

/// Location of the per-user settings file, if a config directory exists.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ttsclean").join("settings.yaml"))
}

/// Parses one `--set KEY=VALUE` argument.
pub fn parse_override(arg: &str) -> Result<(String, ConfigValue)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid --set '{}': expected KEY=VALUE", arg))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("Invalid --set '{}': empty key", arg));
    }
    let value = match value.parse::<ConfigValue>() {
        Ok(value) => value,
        Err(never) => match never {},
    };
    Ok((key.to_string(), value))
}

fn user_settings(explicit: Option<&Path>) -> Result<Option<Settings>> {
    if let Some(path) = explicit {
        return Settings::load_from_file(path).map(Some);
    }
    match default_settings_path() {
        Some(path) if path.is_file() => {
            info!("Using user settings at {}", path.display());
            Settings::load_from_file(&path).map(Some)
        }
        _ => Ok(None),
    }
}

/// Loads the effective settings: defaults, then the user file, then `--set`.
pub fn load_settings(args: &ConfigArgs) -> Result<Settings> {
    let defaults = Settings::load_defaults().context("Failed to load default settings")?;
    let mut settings = merge_settings(defaults, user_settings(args.settings.as_deref())?);
    for arg in &args.set {
        let (key, value) = parse_override(arg)?;
        debug!("Override: {} = {}", key, value);
        settings.set(key, value);
    }
    Ok(settings)
}

/// Loads the stock pipelines, merged with `--pipelines` when given.
pub fn load_pipelines(args: &ConfigArgs) -> Result<PipelineConfig> {
    let defaults = PipelineConfig::load_default_pipelines().context("Failed to load default pipelines")?;
    let user = args
        .pipelines
        .as_deref()
        .map(PipelineConfig::load_from_file)
        .transpose()?;
    Ok(defaults.merge(user))
}
