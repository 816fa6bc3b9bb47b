//! The catalog of named text transformations.
//!
//! `RuleId` is the closed set of rule names that may appear in a pipeline.
//! `Rule` is a rule with its parameters already resolved and compiled,
//! produced by [`compiler::compile_rules`] when a `Sanitizer` is built.

pub mod compiler;
pub mod transforms;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cloze::{self, ClozeMode, RevealContext};
use crate::config::SubstitutionSpec;
use crate::delimiters::strip_within;
use crate::errors::SanitizeError;
use crate::patterns::GROUP_REF;

/// Identifier of a transformation, as written in pipeline definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    CharEllipsize,
    CharRemove,
    ClozesBraced,
    ClozesRendered,
    ClozesRevealed,
    Counter,
    CustomSub,
    Ellipses,
    Filenames,
    HintContent,
    HintLinks,
    Html,
    NewlineEllipsize,
    SoundsOurs,
    SoundsTheirs,
    SoundsUniv,
    Whitespace,
    WithinBraces,
    WithinBrackets,
    WithinParens,
}

impl RuleId {
    pub const ALL: [RuleId; 20] = [
        RuleId::CharEllipsize,
        RuleId::CharRemove,
        RuleId::ClozesBraced,
        RuleId::ClozesRendered,
        RuleId::ClozesRevealed,
        RuleId::Counter,
        RuleId::CustomSub,
        RuleId::Ellipses,
        RuleId::Filenames,
        RuleId::HintContent,
        RuleId::HintLinks,
        RuleId::Html,
        RuleId::NewlineEllipsize,
        RuleId::SoundsOurs,
        RuleId::SoundsTheirs,
        RuleId::SoundsUniv,
        RuleId::Whitespace,
        RuleId::WithinBraces,
        RuleId::WithinBrackets,
        RuleId::WithinParens,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::CharEllipsize => "char_ellipsize",
            RuleId::CharRemove => "char_remove",
            RuleId::ClozesBraced => "clozes_braced",
            RuleId::ClozesRendered => "clozes_rendered",
            RuleId::ClozesRevealed => "clozes_revealed",
            RuleId::Counter => "counter",
            RuleId::CustomSub => "custom_sub",
            RuleId::Ellipses => "ellipses",
            RuleId::Filenames => "filenames",
            RuleId::HintContent => "hint_content",
            RuleId::HintLinks => "hint_links",
            RuleId::Html => "html",
            RuleId::NewlineEllipsize => "newline_ellipsize",
            RuleId::SoundsOurs => "sounds_ours",
            RuleId::SoundsTheirs => "sounds_theirs",
            RuleId::SoundsUniv => "sounds_univ",
            RuleId::Whitespace => "whitespace",
            RuleId::WithinBraces => "within_braces",
            RuleId::WithinBrackets => "within_brackets",
            RuleId::WithinParens => "within_parens",
        }
    }

    /// One-line description, used by the CLI's rule listing.
    pub fn description(&self) -> &'static str {
        match self {
            RuleId::CharEllipsize => "replace each listed character with an ellipsis",
            RuleId::CharRemove => "remove each listed character",
            RuleId::ClozesBraced => "handle {{c1::...}} placeholders",
            RuleId::ClozesRendered => "handle rendered question-side cloze spans",
            RuleId::ClozesRevealed => "keep only revealed cloze text, with optional context",
            RuleId::Counter => "replace runs of listed characters with their count",
            RuleId::CustomSub => "apply user substitutions in order",
            RuleId::Ellipses => "collapse runs of periods into a padded ellipsis",
            RuleId::Filenames => "remove generated audio filenames",
            RuleId::HintContent => "remove hint blocks",
            RuleId::HintLinks => "remove hint links",
            RuleId::Html => "strip markup and decode entities",
            RuleId::NewlineEllipsize => "replace line breaks with an ellipsis",
            RuleId::SoundsOurs => "remove sound tags for generated files",
            RuleId::SoundsTheirs => "remove sound tags for other files",
            RuleId::SoundsUniv => "remove all sound tags",
            RuleId::Whitespace => "collapse and trim whitespace",
            RuleId::WithinBraces => "remove {text in braces}",
            RuleId::WithinBrackets => "remove [text in brackets]",
            RuleId::WithinParens => "remove (text in parentheses)",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleId {
    type Err = SanitizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| SanitizeError::UnknownRule(s.to_string()))
    }
}

/// An ordered, de-duplicated set of characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharSet(Vec<char>);

impl CharSet {
    pub fn contains(&self, c: char) -> bool {
        self.0.contains(&c)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.0
    }
}

impl FromIterator<char> for CharSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut chars = Vec::new();
        for c in iter {
            if !chars.contains(&c) {
                chars.push(c);
            }
        }
        CharSet(chars)
    }
}

impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: String = self.0.iter().collect();
        write!(f, "{:?}", s)
    }
}

/// Run-length counting of repeated characters.
#[derive(Debug, Clone)]
pub struct Counter {
    pub chars: CharSet,
    pub wrap: bool,
    runs: Option<Regex>,
}

impl Counter {
    pub fn new(chars: CharSet, wrap: bool) -> Result<Self, regex::Error> {
        let runs = if chars.is_empty() {
            None
        } else {
            let class: String = chars
                .chars()
                .iter()
                .map(|c| regex::escape(&c.to_string()))
                .collect();
            Some(Regex::new(&format!("[{}]{{2,}}", class))?)
        };
        Ok(Self { chars, wrap, runs })
    }

    pub(crate) fn runs(&self) -> Option<&Regex> {
        self.runs.as_ref()
    }
}

/// Rewrites `$1` as `${1}` so a reference followed by a word character
/// (`$1kg`) still names group 1.
fn brace_group_refs(replace: &str) -> String {
    GROUP_REF
        .replace_all(replace, |caps: &regex::Captures| match caps.get(1) {
            Some(n) => format!("${{{}}}", n.as_str()),
            None => "$$".to_string(),
        })
        .into_owned()
}

/// A compiled user substitution.
#[derive(Debug, Clone)]
pub struct Substitution {
    pub input: String,
    pub replace: String,
    pub literal: bool,
    pattern: Regex,
    expansion: String,
}

impl Substitution {
    pub fn compile(spec: &SubstitutionSpec) -> Result<Self, SanitizeError> {
        let source = if spec.regex {
            spec.input.clone()
        } else {
            regex::escape(&spec.input)
        };
        let pattern = RegexBuilder::new(&source)
            .case_insensitive(spec.ignore_case)
            .size_limit(10 * (1 << 20))
            .build()
            .map_err(|e| SanitizeError::SubstitutionCompile(spec.input.clone(), e))?;
        Ok(Self {
            input: spec.input.clone(),
            replace: spec.replace.clone(),
            literal: !spec.regex,
            pattern,
            expansion: brace_group_refs(&spec.replace),
        })
    }

    pub fn apply(&self, text: &str) -> String {
        if self.literal {
            self.pattern
                .replace_all(text, regex::NoExpand(&self.replace))
                .into_owned()
        } else {
            self.pattern
                .replace_all(text, self.expansion.as_str())
                .into_owned()
        }
    }
}

/// A transformation with its parameters resolved.
#[derive(Debug, Clone)]
pub enum Rule {
    CharEllipsize(CharSet),
    CharRemove(CharSet),
    ClozesBraced(ClozeMode),
    ClozesRendered(ClozeMode),
    ClozesRevealed(RevealContext),
    Counter(Counter),
    CustomSub(Vec<Substitution>),
    Ellipses,
    Filenames,
    HintContent,
    HintLinks,
    Html,
    NewlineEllipsize,
    SoundsOurs,
    SoundsTheirs,
    SoundsUniv,
    Whitespace,
    WithinBraces,
    WithinBrackets,
    WithinParens,
}

impl Rule {
    pub fn id(&self) -> RuleId {
        match self {
            Rule::CharEllipsize(_) => RuleId::CharEllipsize,
            Rule::CharRemove(_) => RuleId::CharRemove,
            Rule::ClozesBraced(_) => RuleId::ClozesBraced,
            Rule::ClozesRendered(_) => RuleId::ClozesRendered,
            Rule::ClozesRevealed(_) => RuleId::ClozesRevealed,
            Rule::Counter(_) => RuleId::Counter,
            Rule::CustomSub(_) => RuleId::CustomSub,
            Rule::Ellipses => RuleId::Ellipses,
            Rule::Filenames => RuleId::Filenames,
            Rule::HintContent => RuleId::HintContent,
            Rule::HintLinks => RuleId::HintLinks,
            Rule::Html => RuleId::Html,
            Rule::NewlineEllipsize => RuleId::NewlineEllipsize,
            Rule::SoundsOurs => RuleId::SoundsOurs,
            Rule::SoundsTheirs => RuleId::SoundsTheirs,
            Rule::SoundsUniv => RuleId::SoundsUniv,
            Rule::Whitespace => RuleId::Whitespace,
            Rule::WithinBraces => RuleId::WithinBraces,
            Rule::WithinBrackets => RuleId::WithinBrackets,
            Rule::WithinParens => RuleId::WithinParens,
        }
    }

    /// Human-readable parameters, or `None` for parameterless rules.
    pub fn params(&self) -> Option<String> {
        match self {
            Rule::CharEllipsize(chars) | Rule::CharRemove(chars) => Some(chars.to_string()),
            Rule::ClozesBraced(mode) | Rule::ClozesRendered(mode) => Some(mode.to_string()),
            Rule::ClozesRevealed(ctx) => Some(format!(
                "before={} until={:?}, after={} until={:?}",
                ctx.before,
                ctx.before_until.iter().collect::<String>(),
                ctx.after,
                ctx.after_until.iter().collect::<String>(),
            )),
            Rule::Counter(counter) => Some(format!("{}, wrap={}", counter.chars, counter.wrap)),
            Rule::CustomSub(subs) => Some(
                subs.iter()
                    .map(|s| format!("{:?} -> {:?}", s.input, s.replace))
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            _ => None,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        match self {
            Rule::CharEllipsize(chars) => transforms::char_ellipsize(text, chars),
            Rule::CharRemove(chars) => transforms::char_remove(text, chars),
            Rule::ClozesBraced(mode) => cloze::replace_braced(text, *mode),
            Rule::ClozesRendered(mode) => cloze::replace_rendered(text, *mode),
            Rule::ClozesRevealed(ctx) => cloze::extract_revealed(text, ctx),
            Rule::Counter(counter) => transforms::counter(text, counter),
            Rule::CustomSub(subs) => transforms::custom_sub(text, subs),
            Rule::Ellipses => transforms::ellipses(text),
            Rule::Filenames => transforms::filenames(text),
            Rule::HintContent => transforms::hint_content(text),
            Rule::HintLinks => transforms::hint_links(text),
            Rule::Html => transforms::html(text),
            Rule::NewlineEllipsize => transforms::newline_ellipsize(text),
            Rule::SoundsOurs => transforms::sounds_ours(text),
            Rule::SoundsTheirs => transforms::sounds_theirs(text),
            Rule::SoundsUniv => transforms::sounds_univ(text),
            Rule::Whitespace => transforms::whitespace(text),
            Rule::WithinBraces => strip_within(text, '{', '}'),
            Rule::WithinBrackets => strip_within(text, '[', ']'),
            Rule::WithinParens => strip_within(text, '(', ')'),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.params() {
            Some(params) => write!(f, "{}({})", self.id(), params),
            None => write!(f, "{}", self.id()),
        }
    }
}
