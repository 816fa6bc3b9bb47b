// ttsclean-core/src/headless.rs
//! `headless.rs`
//! Convenience wrappers for one-shot sanitization without wiring up a
//! `Sanitizer` by hand. The stock pipelines and default settings are used,
//! with the caller's settings layered on top.

use anyhow::{Context, Result};

use crate::config::{merge_settings, PipelineConfig, Settings};
use crate::engine::Sanitizer;

/// Sanitizes `content` with the named stock pipeline.
///
/// # Arguments
///
/// * `pipeline` - Name of a stock pipeline (`notes`, `templates`, ...).
/// * `overrides` - Settings to apply over the defaults; may be empty.
/// * `content` - The text to sanitize.
pub fn headless_sanitize_string(pipeline: &str, overrides: Settings, content: &str) -> Result<String> {
    let pipelines = PipelineConfig::load_default_pipelines()?;
    let settings = merge_settings(Settings::load_defaults()?, Some(overrides));
    let sanitizer = Sanitizer::from_pipeline(&pipelines, pipeline, &settings)
        .with_context(|| format!("Failed to build sanitizer for pipeline '{}'", pipeline))?;
    Ok(sanitizer.sanitize(content))
}
