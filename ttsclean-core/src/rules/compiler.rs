//! compiler.rs - Resolves rule descriptors against settings.
//!
//! Gates are evaluated and parameters are looked up, type-checked and
//! compiled here, once, when a `Sanitizer` is built. Anything wrong with a
//! pipeline (an unknown settings key, a parameter of the wrong shape, a
//! substitution pattern that does not compile) is reported here rather than
//! while text is being processed.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};

use super::{CharSet, Counter, Rule, RuleId, Substitution};
use crate::cloze::{ClozeMode, RevealContext};
use crate::config::{ConfigValue, Gate, RuleSpec, Settings};
use crate::errors::{Result, SanitizeError};

fn lookup(rule: RuleId, key: &str, settings: &Settings) -> Result<ConfigValue> {
    settings
        .get(key)
        .cloned()
        .ok_or_else(|| SanitizeError::MissingSetting {
            rule: rule.to_string(),
            key: key.to_string(),
        })
}

fn lookup_all(rule: RuleId, keys: &[String], settings: &Settings) -> Result<Vec<ConfigValue>> {
    keys.iter().map(|key| lookup(rule, key, settings)).collect()
}

/// Every key in the gate must exist; the gate is open if any is truthy.
fn gate_open(rule: RuleId, gate: &Gate, settings: &Settings) -> Result<bool> {
    let mut open = false;
    for key in gate.keys() {
        open |= lookup(rule, key, settings)?.is_truthy();
    }
    Ok(open)
}

/// Returns the arguments a descriptor resolves to, or `None` when its gate
/// is closed.
fn resolve_args(spec: &RuleSpec, settings: &Settings) -> Result<Option<Vec<ConfigValue>>> {
    match spec {
        RuleSpec::Always(_) => Ok(Some(Vec::new())),
        RuleSpec::Flag { rule, when, aux } => {
            if gate_open(*rule, when, settings)? {
                lookup_all(*rule, aux, settings).map(Some)
            } else {
                Ok(None)
            }
        }
        RuleSpec::Value { rule, value, aux } => {
            let value = lookup(*rule, value, settings)?;
            if value.is_true() {
                lookup_all(*rule, aux, settings).map(Some)
            } else if value.is_truthy() {
                let mut args = vec![value];
                args.extend(lookup_all(*rule, aux, settings)?);
                Ok(Some(args))
            } else {
                Ok(None)
            }
        }
    }
}

fn invalid(rule: RuleId, reason: impl Into<String>) -> SanitizeError {
    SanitizeError::InvalidParameter {
        rule: rule.to_string(),
        reason: reason.into(),
    }
}

fn take<const N: usize>(rule: RuleId, args: Vec<ConfigValue>) -> Result<[ConfigValue; N]> {
    args.try_into().map_err(|args: Vec<ConfigValue>| SanitizeError::WrongArity {
        rule: rule.to_string(),
        expected: N,
        found: args.len(),
    })
}

fn char_set(rule: RuleId, value: &ConfigValue) -> Result<CharSet> {
    match value {
        ConfigValue::Text(s) => Ok(s.chars().collect()),
        ConfigValue::List(items) => Ok(items.iter().flat_map(|s| s.chars()).collect()),
        ConfigValue::Flag(false) => Ok(CharSet::default()),
        other => Err(invalid(rule, format!("expected a set of characters, found {}", other))),
    }
}

fn count(rule: RuleId, value: &ConfigValue) -> Result<usize> {
    match value {
        ConfigValue::Number(n) => {
            usize::try_from(*n).map_err(|_| invalid(rule, format!("count {} is too large", n)))
        }
        ConfigValue::Flag(false) => Ok(0),
        other => Err(invalid(rule, format!("expected a word count, found {}", other))),
    }
}

fn flag(rule: RuleId, value: &ConfigValue) -> Result<bool> {
    match value {
        ConfigValue::Flag(b) => Ok(*b),
        ConfigValue::Number(n) => Ok(*n != 0),
        other => Err(invalid(rule, format!("expected true or false, found {}", other))),
    }
}

fn cloze_mode(rule: RuleId, value: &ConfigValue) -> Result<ClozeMode> {
    match value {
        ConfigValue::Text(s) => s.parse().map_err(|reason: String| invalid(rule, reason)),
        other => Err(invalid(rule, format!("expected a cloze mode, found {}", other))),
    }
}

fn substitutions(rule: RuleId, value: &ConfigValue) -> Result<Vec<Substitution>> {
    let specs = match value {
        ConfigValue::Substitutions(specs) => specs.as_slice(),
        ConfigValue::List(items) if items.is_empty() => &[],
        other => return Err(invalid(rule, format!("expected a list of substitutions, found {}", other))),
    };

    let mut compiled = Vec::with_capacity(specs.len());
    for spec in specs {
        if spec.input.is_empty() {
            warn!("Skipping substitution with an empty input (replacement {:?}).", spec.replace);
            continue;
        }
        compiled.push(Substitution::compile(spec)?);
    }
    Ok(compiled)
}

fn no_params(rule: RuleId, args: Vec<ConfigValue>, built: Rule) -> Result<Rule> {
    take::<0>(rule, args)?;
    Ok(built)
}

/// Builds one rule from its resolved arguments.
pub fn build_rule(rule: RuleId, args: Vec<ConfigValue>) -> Result<Rule> {
    match rule {
        RuleId::CharEllipsize => {
            let [chars] = take(rule, args)?;
            Ok(Rule::CharEllipsize(char_set(rule, &chars)?))
        }
        RuleId::CharRemove => {
            let [chars] = take(rule, args)?;
            Ok(Rule::CharRemove(char_set(rule, &chars)?))
        }
        RuleId::ClozesBraced => {
            let [mode] = take(rule, args)?;
            Ok(Rule::ClozesBraced(cloze_mode(rule, &mode)?))
        }
        RuleId::ClozesRendered => {
            let [mode] = take(rule, args)?;
            Ok(Rule::ClozesRendered(cloze_mode(rule, &mode)?))
        }
        RuleId::ClozesRevealed => {
            if args.is_empty() {
                return Ok(Rule::ClozesRevealed(RevealContext::default()));
            }
            let [before, before_until, after, after_until] = take(rule, args)?;
            Ok(Rule::ClozesRevealed(RevealContext {
                before: count(rule, &before)?,
                before_until: char_set(rule, &before_until)?.chars().to_vec(),
                after: count(rule, &after)?,
                after_until: char_set(rule, &after_until)?.chars().to_vec(),
            }))
        }
        RuleId::Counter => {
            let (chars, wrap) = match args.len() {
                1 => {
                    let [chars] = take(rule, args)?;
                    (chars, false)
                }
                _ => {
                    let [chars, wrap] = take(rule, args)?;
                    let wrap = flag(rule, &wrap)?;
                    (chars, wrap)
                }
            };
            let counter = Counter::new(char_set(rule, &chars)?, wrap)
                .map_err(|e| invalid(rule, e.to_string()))?;
            Ok(Rule::Counter(counter))
        }
        RuleId::CustomSub => {
            let [subs] = take(rule, args)?;
            Ok(Rule::CustomSub(substitutions(rule, &subs)?))
        }
        RuleId::Ellipses => no_params(rule, args, Rule::Ellipses),
        RuleId::Filenames => no_params(rule, args, Rule::Filenames),
        RuleId::HintContent => no_params(rule, args, Rule::HintContent),
        RuleId::HintLinks => no_params(rule, args, Rule::HintLinks),
        RuleId::Html => no_params(rule, args, Rule::Html),
        RuleId::NewlineEllipsize => no_params(rule, args, Rule::NewlineEllipsize),
        RuleId::SoundsOurs => no_params(rule, args, Rule::SoundsOurs),
        RuleId::SoundsTheirs => no_params(rule, args, Rule::SoundsTheirs),
        RuleId::SoundsUniv => no_params(rule, args, Rule::SoundsUniv),
        RuleId::Whitespace => no_params(rule, args, Rule::Whitespace),
        RuleId::WithinBraces => no_params(rule, args, Rule::WithinBraces),
        RuleId::WithinBrackets => no_params(rule, args, Rule::WithinBrackets),
        RuleId::WithinParens => no_params(rule, args, Rule::WithinParens),
    }
}

/// Compiles a pipeline into the rules that will actually run, in order.
/// Rules whose gate is closed under `settings` are left out.
pub fn compile_rules(specs: &[RuleSpec], settings: &Settings) -> Result<Vec<Rule>> {
    debug!("Starting compilation of {} rule descriptors.", specs.len());

    let mut compiled = Vec::with_capacity(specs.len());
    for spec in specs {
        match resolve_args(spec, settings)? {
            Some(args) => {
                let rule = build_rule(spec.rule(), args)?;
                debug!("Rule '{}' compiled successfully.", rule);
                compiled.push(rule);
            }
            None => debug!("Rule '{}' skipped: gate is closed.", spec.rule()),
        }
    }

    debug!(
        "Finished compiling rules. Total active: {} of {}.",
        compiled.len(),
        specs.len()
    );
    Ok(compiled)
}
