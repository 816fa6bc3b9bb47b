// ttsclean-core/src/engine.rs
//! The `Sanitizer`: a compiled pipeline ready to process text.
//!
//! Building a `Sanitizer` resolves every gate and parameter against the
//! supplied settings, so the rule list it holds is exactly the list that
//! runs. Sanitizing is synchronous, pure and infallible; a single instance
//! can be shared across threads.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::config::{PipelineConfig, RuleSpec, Settings};
use crate::errors::Result;
use crate::rules::compiler::compile_rules;
use crate::rules::Rule;
use crate::trace::{TraceEntry, TraceSink, Transformation};

pub struct Sanitizer {
    rules: Vec<Rule>,
    sink: Option<Arc<dyn TraceSink>>,
}

impl Sanitizer {
    /// Compiles `specs` against `settings`, without a trace sink.
    pub fn new(specs: &[RuleSpec], settings: &Settings) -> Result<Self> {
        Self::build(specs, settings, None)
    }

    /// Compiles `specs` against `settings`; every invocation will report its
    /// summary line to `sink`.
    pub fn with_sink(
        specs: &[RuleSpec],
        settings: &Settings,
        sink: Arc<dyn TraceSink>,
    ) -> Result<Self> {
        Self::build(specs, settings, Some(sink))
    }

    /// Looks up a named pipeline and compiles it.
    pub fn from_pipeline(pipelines: &PipelineConfig, name: &str, settings: &Settings) -> Result<Self> {
        let specs = pipelines.get(name)?;
        debug!("Building sanitizer for pipeline '{}'.", name);
        Self::new(specs, settings)
    }

    fn build(specs: &[RuleSpec], settings: &Settings, sink: Option<Arc<dyn TraceSink>>) -> Result<Self> {
        let rules = compile_rules(specs, settings)?;
        Ok(Self { rules, sink })
    }

    /// Attaches (or replaces) the trace sink.
    pub fn set_sink(&mut self, sink: Arc<dyn TraceSink>) {
        self.sink = Some(sink);
    }

    /// The rules that will run, in order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Runs the pipeline and returns the full record of what happened.
    pub fn transform(&self, text: &str) -> Transformation {
        let mut steps = Vec::with_capacity(self.rules.len() + 1);
        let mut working = text.to_string();
        let mut early_exit = false;

        for rule in &self.rules {
            if working.is_empty() {
                steps.push(TraceEntry::EarlyExit);
                early_exit = true;
                break;
            }
            working = rule.apply(&working);
            steps.push(TraceEntry::Applied {
                rule: rule.id(),
                params: rule.params(),
                output: working.clone(),
            });
        }

        let transformation = Transformation {
            steps,
            early_exit,
            output: working,
        };

        if let Some(sink) = &self.sink {
            sink.record(&transformation.summary_line());
        }

        transformation
    }

    /// Runs the pipeline and returns only the resulting text.
    pub fn sanitize(&self, text: &str) -> String {
        self.transform(text).output
    }
}

impl fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sanitizer")
            .field("rules", &self.rules)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
