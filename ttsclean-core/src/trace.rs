//! trace.rs - Per-invocation record of which rules ran.
//!
//! A `Transformation` is produced by every call to
//! [`Sanitizer::transform`](crate::engine::Sanitizer::transform). Its
//! one-line summary is what gets handed to a [`TraceSink`].
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use serde::Serialize;

use crate::rules::RuleId;

/// One step of a transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEntry {
    /// A rule ran; `output` is the text it produced.
    Applied {
        rule: RuleId,
        #[serde(skip_serializing_if = "Option::is_none")]
        params: Option<String>,
        output: String,
    },
    /// The working text became empty, so the remaining rules were skipped.
    EarlyExit,
}

impl TraceEntry {
    /// The label used for this entry in the summary line.
    pub fn label(&self) -> String {
        match self {
            TraceEntry::Applied {
                rule,
                params: Some(params),
                ..
            } => format!("{}({})", rule, params),
            TraceEntry::Applied { rule, .. } => rule.to_string(),
            TraceEntry::EarlyExit => "early exit".to_string(),
        }
    }
}

/// The full record of one `sanitize` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transformation {
    pub steps: Vec<TraceEntry>,
    pub early_exit: bool,
    pub output: String,
}

impl Transformation {
    /// Rules that actually ran, in order.
    pub fn applied(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.steps.iter().filter_map(|step| match step {
            TraceEntry::Applied { rule, .. } => Some(*rule),
            TraceEntry::EarlyExit => None,
        })
    }

    /// `Transformation using [html, whitespace]: some text`
    pub fn summary_line(&self) -> String {
        let labels: Vec<String> = self.steps.iter().map(TraceEntry::label).collect();
        let text = if self.output.is_empty() {
            "(empty string)"
        } else {
            self.output.as_str()
        };
        format!("Transformation using [{}]: {}", labels.join(", "), text)
    }
}

/// Receives the summary line of each sanitize invocation.
pub trait TraceSink: Send + Sync {
    fn record(&self, line: &str);
}

/// Forwards trace lines to the `log` facade at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn record(&self, line: &str) {
        debug!("{}", line);
    }
}
