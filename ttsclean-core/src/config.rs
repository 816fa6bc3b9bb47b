//! Configuration management for `ttsclean-core`.
//!
//! This module defines the settings lookup that gates rules, the rule
//! descriptors that make up a pipeline, and the named pipelines themselves.
//! It handles YAML (de)serialization, the embedded defaults, and merging of
//! user overrides on top of them.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::SanitizeError;
use crate::rules::RuleId;

/// A user substitution as stored in settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionSpec {
    /// Text (or pattern, when `regex` is set) to look for.
    pub input: String,
    /// Replacement. Supports `$1`, `${1}` and `${name}` group references
    /// when `regex` is set; `$$` is a literal dollar sign.
    #[serde(default)]
    pub replace: String,
    #[serde(default)]
    pub regex: bool,
    #[serde(default)]
    pub ignore_case: bool,
}

/// One settings value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Flag(bool),
    Number(u64),
    Text(String),
    List(Vec<String>),
    Substitutions(Vec<SubstitutionSpec>),
}

impl ConfigValue {
    /// `false`, `0`, and empty text or lists are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            ConfigValue::Flag(b) => *b,
            ConfigValue::Number(n) => *n != 0,
            ConfigValue::Text(s) => !s.is_empty(),
            ConfigValue::List(items) => !items.is_empty(),
            ConfigValue::Substitutions(subs) => !subs.is_empty(),
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, ConfigValue::Flag(true))
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Flag(value)
    }
}

impl From<u64> for ConfigValue {
    fn from(value: u64) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

impl From<Vec<SubstitutionSpec>> for ConfigValue {
    fn from(value: Vec<SubstitutionSpec>) -> Self {
        ConfigValue::Substitutions(value)
    }
}

/// Parses a YAML literal (`true`, `3`, `"..."`, `[a, b]`, ...). Anything
/// that is not valid YAML for a settings value is taken as plain text.
impl FromStr for ConfigValue {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(ConfigValue::Text(s.to_string()));
        }
        Ok(serde_yml::from_str(s).unwrap_or_else(|_| ConfigValue::Text(s.to_string())))
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Flag(b) => write!(f, "{}", b),
            ConfigValue::Number(n) => write!(f, "{}", n),
            ConfigValue::Text(s) => write!(f, "{:?}", s),
            ConfigValue::List(items) => write!(f, "{:?}", items),
            ConfigValue::Substitutions(subs) => write!(f, "<{} substitution(s)>", subs.len()),
        }
    }
}

/// The settings lookup consulted when a pipeline is compiled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, ConfigValue>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the stock settings embedded in the library.
    pub fn load_defaults() -> Result<Self> {
        debug!("Loading default settings from embedded string...");
        let default_yaml = include_str!("../config/default_settings.yaml");
        let settings: Settings =
            serde_yml::from_str(default_yaml).context("Failed to parse default settings")?;
        debug!("Loaded {} default settings.", settings.len());
        Ok(settings)
    }

    /// Loads a YAML mapping of settings from a file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading settings from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: Settings = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        info!("Loaded {} settings from file {}.", settings.len(), path.display());
        Ok(settings)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
        self.values.insert(key.into(), value.into())
    }

    /// Builder-style `set`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, ConfigValue)> for Settings {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Overlays user settings on top of the defaults.
pub fn merge_settings(defaults: Settings, user: Option<Settings>) -> Settings {
    let mut merged = defaults;
    if let Some(user) = user {
        debug!("Merging {} user settings over {} defaults.", user.len(), merged.len());
        merged.values.extend(user.values);
    }
    merged
}

/// The settings key (or keys) gating a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Gate {
    Key(String),
    /// Open when any of the keys is truthy.
    AnyOf(Vec<String>),
}

impl Gate {
    pub fn keys(&self) -> &[String] {
        match self {
            Gate::Key(key) => std::slice::from_ref(key),
            Gate::AnyOf(keys) => keys,
        }
    }
}

/// One entry of a pipeline.
///
/// In YAML an unconditional rule is written as its bare name; gated rules
/// are mappings:
///
/// ```yaml
/// - html
/// - rule: within_parens
///   when: strip_note_parens
/// - rule: counter
///   value: spec_note_count
///   with: [spec_note_count_wrap]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    /// Always applied; the rule takes no parameters.
    Always(RuleId),
    /// Applied when the gate is truthy; parameters come from the `with` keys.
    Flag {
        rule: RuleId,
        when: Gate,
        #[serde(default, rename = "with", skip_serializing_if = "Vec::is_empty")]
        aux: Vec<String>,
    },
    /// Applied when the value is truthy; the value is the first parameter,
    /// followed by the `with` keys. A value of exactly `true` acts as a flag.
    Value {
        rule: RuleId,
        value: String,
        #[serde(default, rename = "with", skip_serializing_if = "Vec::is_empty")]
        aux: Vec<String>,
    },
}

impl RuleSpec {
    pub fn always(rule: RuleId) -> Self {
        RuleSpec::Always(rule)
    }

    pub fn flag(rule: RuleId, key: impl Into<String>) -> Self {
        RuleSpec::Flag {
            rule,
            when: Gate::Key(key.into()),
            aux: Vec::new(),
        }
    }

    pub fn flag_any<I, S>(rule: RuleId, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RuleSpec::Flag {
            rule,
            when: Gate::AnyOf(keys.into_iter().map(Into::into).collect()),
            aux: Vec::new(),
        }
    }

    pub fn value(rule: RuleId, key: impl Into<String>) -> Self {
        RuleSpec::Value {
            rule,
            value: key.into(),
            aux: Vec::new(),
        }
    }

    /// Adds auxiliary parameter keys. No effect on `Always`.
    pub fn with_aux<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let RuleSpec::Flag { aux, .. } | RuleSpec::Value { aux, .. } = &mut self {
            aux.extend(keys.into_iter().map(Into::into));
        }
        self
    }

    pub fn rule(&self) -> RuleId {
        match self {
            RuleSpec::Always(rule) | RuleSpec::Flag { rule, .. } | RuleSpec::Value { rule, .. } => {
                *rule
            }
        }
    }
}

/// Named pipelines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub pipelines: BTreeMap<String, Vec<RuleSpec>>,
}

impl PipelineConfig {
    /// Loads the stock pipelines embedded in the library.
    pub fn load_default_pipelines() -> Result<Self> {
        debug!("Loading default pipelines from embedded string...");
        let default_yaml = include_str!("../config/default_pipelines.yaml");
        let config: PipelineConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default pipelines")?;
        debug!("Loaded {} default pipelines.", config.pipelines.len());
        Ok(config)
    }

    /// Loads pipelines from a YAML file. Unknown rule names fail here.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading pipelines from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipelines file {}", path.display()))?;
        let config: PipelineConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse pipelines file {}", path.display()))?;
        info!("Loaded {} pipelines from file {}.", config.pipelines.len(), path.display());
        Ok(config)
    }

    pub fn get(&self, name: &str) -> Result<&[RuleSpec], SanitizeError> {
        self.pipelines
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| SanitizeError::UnknownPipeline(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pipelines.keys().map(String::as_str)
    }

    /// User pipelines replace same-named pipelines and add new ones.
    pub fn merge(mut self, user: Option<PipelineConfig>) -> Self {
        if let Some(user) = user {
            debug!("Merging {} user pipelines.", user.pipelines.len());
            self.pipelines.extend(user.pipelines);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!ConfigValue::Flag(false).is_truthy());
        assert!(!ConfigValue::Number(0).is_truthy());
        assert!(!ConfigValue::Text(String::new()).is_truthy());
        assert!(!ConfigValue::List(vec![]).is_truthy());
        assert!(ConfigValue::Text("x".into()).is_truthy());
        assert!(ConfigValue::Number(2).is_truthy());
        assert!(ConfigValue::Flag(true).is_true());
        assert!(!ConfigValue::Text("true".into()).is_true());
    }

    #[test]
    fn parses_literals() {
        assert_eq!("true".parse::<ConfigValue>().unwrap(), ConfigValue::Flag(true));
        assert_eq!("3".parse::<ConfigValue>().unwrap(), ConfigValue::Number(3));
        assert_eq!("wrap".parse::<ConfigValue>().unwrap(), ConfigValue::Text("wrap".into()));
        assert_eq!("".parse::<ConfigValue>().unwrap(), ConfigValue::Text(String::new()));
        assert_eq!(
            "[a, b]".parse::<ConfigValue>().unwrap(),
            ConfigValue::List(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn rule_specs_from_yaml() {
        let yaml = r#"
- html
- rule: within_parens
  when: strip_parens
- rule: hint_content
  when: [a, b]
- rule: counter
  value: count_chars
  with: [count_wrap]
"#;
        let specs: Vec<RuleSpec> = serde_yml::from_str(yaml).unwrap();
        assert_eq!(
            specs,
            vec![
                RuleSpec::always(RuleId::Html),
                RuleSpec::flag(RuleId::WithinParens, "strip_parens"),
                RuleSpec::flag_any(RuleId::HintContent, ["a", "b"]),
                RuleSpec::value(RuleId::Counter, "count_chars").with_aux(["count_wrap"]),
            ]
        );
    }

    #[test]
    fn unknown_rule_name_fails_to_parse() {
        let result: Result<Vec<RuleSpec>, _> = serde_yml::from_str("- html\n- bogus\n");
        assert!(result.is_err());
    }

    #[test]
    fn substitutions_deserialize() {
        let yaml = r#"
sub_note:
  - input: Dr.
    replace: doctor
  - input: '(\d+)kg'
    replace: '$1 kilograms'
    regex: true
"#;
        let settings: Settings = serde_yml::from_str(yaml).unwrap();
        match settings.get("sub_note") {
            Some(ConfigValue::Substitutions(subs)) => {
                assert_eq!(subs.len(), 2);
                assert!(!subs[0].regex);
                assert!(subs[1].regex);
            }
            other => panic!("unexpected value: {:?}", other),
        }
    }

    #[test]
    fn merge_overrides_defaults() {
        let defaults = Settings::new().with("a", true).with("b", "x");
        let user = Settings::new().with("b", "y");
        let merged = merge_settings(defaults, Some(user));
        assert_eq!(merged.get("a"), Some(&ConfigValue::Flag(true)));
        assert_eq!(merged.get("b"), Some(&ConfigValue::Text("y".into())));
    }

    #[test]
    fn embedded_defaults_load() {
        let settings = Settings::load_defaults().unwrap();
        assert!(!settings.is_empty());
        let pipelines = PipelineConfig::load_default_pipelines().unwrap();
        for name in ["notes", "templates", "strip_sounds_ours", "strip_sounds_theirs", "strip_sounds_univ"] {
            assert!(pipelines.get(name).is_ok(), "missing pipeline {}", name);
        }
        assert!(matches!(
            pipelines.get("nope"),
            Err(SanitizeError::UnknownPipeline(_))
        ));
    }
}
