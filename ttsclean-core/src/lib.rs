// ttsclean-core/src/lib.rs
//! # ttsclean Core Library
//!
//! `ttsclean-core` turns the raw text of flashcard fields and rendered card
//! templates into plain text suitable for a speech synthesizer. Markup,
//! cloze placeholders, sound tags, generated filenames, delimited asides
//! and user-chosen characters are removed or rewritten by a configurable,
//! ordered pipeline of named rules.
//!
//! The library is pure: it performs no I/O while sanitizing and keeps no
//! state between calls. Loading of YAML configuration is the only fallible
//! file access it offers.
//!
//! ## Modules
//!
//! * `patterns`: The shared, precompiled regular expressions.
//! * `markup`: Tag stripping, entity decoding and class-based element lookup.
//! * `delimiters`: Nesting-aware removal of `(...)`, `[...]` and `{...}` spans.
//! * `cloze`: Handling of braced, rendered and revealed cloze deletions.
//! * `rules`: The rule catalog, its transformations and the rule compiler.
//! * `config`: Settings, rule descriptors and named pipelines.
//! * `trace`: The per-invocation transformation record and trace sinks.
//! * `engine`: The `Sanitizer`, a compiled pipeline.
//! * `headless`: One-shot sanitization by pipeline name.
//!
//! ## Usage Example
//!
//! ```rust
//! use ttsclean_core::{merge_settings, PipelineConfig, Sanitizer, Settings};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     // 1. Load the stock pipelines and option values.
//!     let pipelines = PipelineConfig::load_default_pipelines()?;
//!     let settings = merge_settings(
//!         Settings::load_defaults()?,
//!         Some(Settings::new().with("strip_note_parens", true)),
//!     );
//!
//!     // 2. Compile the `notes` pipeline once.
//!     let sanitizer = Sanitizer::from_pipeline(&pipelines, "notes", &settings)?;
//!
//!     // 3. Sanitize as many strings as needed.
//!     let spoken = sanitizer.sanitize("<b>Paris</b> (capital) is {{c1::big::size}}");
//!     assert_eq!(spoken, "Paris is size");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Building a `Sanitizer` returns [`SanitizeError`] for unknown pipelines,
//! missing settings and malformed parameters. Configuration loading uses
//! `anyhow::Error` with context. Sanitizing text never fails.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod cloze;
pub mod config;
pub mod delimiters;
pub mod engine;
pub mod errors;
pub mod headless;
pub mod markup;
pub mod patterns;
pub mod rules;
pub mod trace;

/// Re-exports the configuration types and helpers.
pub use config::{merge_settings, ConfigValue, Gate, PipelineConfig, RuleSpec, Settings, SubstitutionSpec};

/// Re-exports the custom error type for clear error reporting.
pub use errors::SanitizeError;

pub use engine::Sanitizer;
pub use cloze::{ClozeMode, RevealContext};
pub use rules::compiler::compile_rules;
pub use rules::{Rule, RuleId};
pub use trace::{LogSink, TraceEntry, TraceSink, Transformation};

/// Re-exports the one-shot helper for non-interactive use.
pub use headless::headless_sanitize_string;
