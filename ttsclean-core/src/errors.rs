//! errors.rs - Custom error types for the ttsclean-core library.
//!
//! Every variant here describes a configuration problem detected while a
//! `Sanitizer` is being built. Sanitizing text itself never fails: malformed
//! markup and unmatched delimiters are absorbed by permissive parsing.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `ttsclean-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SanitizeError {
    #[error("Unknown rule '{0}'")]
    UnknownRule(String),

    #[error("Pipeline '{0}' not found")]
    UnknownPipeline(String),

    #[error("Rule '{rule}' references setting '{key}', which is not defined")]
    MissingSetting { rule: String, key: String },

    #[error("Rule '{rule}' expects {expected} parameter(s) but {found} were resolved")]
    WrongArity {
        rule: String,
        expected: usize,
        found: usize,
    },

    #[error("Rule '{rule}': invalid parameter: {reason}")]
    InvalidParameter { rule: String, reason: String },

    #[error("Failed to compile substitution '{0}': {1}")]
    SubstitutionCompile(String, regex::Error),
}

pub type Result<T> = std::result::Result<T, SanitizeError>;
