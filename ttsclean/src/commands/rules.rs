// ttsclean/src/commands/rules.rs
//! The `rules` and `settings` commands: inspect the catalog and configuration.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use std::io::{self, Write};

use ttsclean_core::{RuleId, Sanitizer};

use crate::cli::{RulesCommand, SettingsCommand};
use crate::commands::{load_pipelines, load_settings};
use crate::ui::output_format::{paint, Style};

/// Writes every rule identifier with its one-line description.
pub fn write_catalog<W: Write>(writer: &mut W, supports_color: bool) -> io::Result<()> {
    let width = RuleId::ALL.iter().map(|id| id.as_str().len()).max().unwrap_or(0);
    for id in RuleId::ALL {
        let name = format!("{:<width$}", id.as_str(), width = width);
        writeln!(writer, "{}  {}", paint(&name, Style::RuleName, supports_color), id.description())?;
    }
    Ok(())
}

/// Entry point for `ttsclean rules`.
pub fn run_rules(cmd: &RulesCommand) -> Result<()> {
    let stdout = io::stdout();
    let supports_color = stdout.is_terminal();
    let mut writer = stdout.lock();

    let Some(name) = &cmd.pipeline else {
        write_catalog(&mut writer, supports_color)?;
        return Ok(());
    };

    let settings = load_settings(&cmd.config)?;
    let pipelines = load_pipelines(&cmd.config)?;
    let sanitizer = Sanitizer::from_pipeline(&pipelines, name, &settings)
        .with_context(|| format!("Failed to build pipeline '{}'", name))?;
    for (n, rule) in sanitizer.rules().iter().enumerate() {
        let label = rule.id().as_str();
        match rule.params() {
            Some(params) => writeln!(
                writer,
                "{:>3}. {}({})",
                n + 1,
                paint(label, Style::RuleName, supports_color),
                params
            )?,
            None => writeln!(writer, "{:>3}. {}", n + 1, paint(label, Style::RuleName, supports_color))?,
        }
    }
    Ok(())
}

/// Entry point for `ttsclean settings`.
pub fn run_settings(cmd: &SettingsCommand) -> Result<()> {
    let settings = load_settings(&cmd.config)?;
    let mut writer = io::stdout().lock();
    serde_json::to_writer_pretty(&mut writer, &settings).context("Failed to serialize settings")?;
    writeln!(writer)?;
    Ok(())
}
