//! Cloze deletion handling.
//!
//! Three input shapes are supported: unrendered `{{c1::text::hint}}`
//! placeholders, question-side rendered `<span class=cloze>[...]</span>`
//! markup, and answer-side markup where the deleted text is revealed inside
//! a `cloze` span.

use regex::Captures;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::markup;
use crate::patterns::{CLOZE_BRACED, CLOZE_RENDERED};

const ELLIPSIS: &str = "...";

/// What to speak in place of a cloze deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClozeMode {
    /// Speak what the card shows: the hint, or an ellipsis.
    #[default]
    Anki,
    /// Surround the hint with ellipses.
    Wrap,
    /// Speak the deleted text.
    Deleted,
    Ellipsize,
    Remove,
}

impl ClozeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClozeMode::Anki => "anki",
            ClozeMode::Wrap => "wrap",
            ClozeMode::Deleted => "deleted",
            ClozeMode::Ellipsize => "ellipsize",
            ClozeMode::Remove => "remove",
        }
    }
}

impl fmt::Display for ClozeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClozeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anki" => Ok(ClozeMode::Anki),
            "wrap" => Ok(ClozeMode::Wrap),
            "deleted" => Ok(ClozeMode::Deleted),
            "ellipsize" => Ok(ClozeMode::Ellipsize),
            "remove" => Ok(ClozeMode::Remove),
            other => Err(format!("unknown cloze mode '{}'", other)),
        }
    }
}

fn wrapped(inner: &str) -> Option<String> {
    let trimmed = inner.trim_matches('.');
    (!trimmed.is_empty()).then(|| format!("... {} ...", trimmed))
}

/// Replaces unrendered cloze placeholders according to `mode`.
pub fn replace_braced(text: &str, mode: ClozeMode) -> String {
    CLOZE_BRACED
        .replace_all(text, |caps: &Captures| {
            let deleted = caps.get(1).map_or("", |m| m.as_str());
            let hint = caps.get(3).map(|m| m.as_str()).filter(|h| !h.is_empty());
            match mode {
                ClozeMode::Ellipsize => ELLIPSIS.to_string(),
                ClozeMode::Remove => String::new(),
                ClozeMode::Wrap => hint.and_then(wrapped).unwrap_or_else(|| ELLIPSIS.to_string()),
                ClozeMode::Deleted if deleted.is_empty() => ELLIPSIS.to_string(),
                ClozeMode::Deleted => deleted.to_string(),
                ClozeMode::Anki => hint.unwrap_or(ELLIPSIS).to_string(),
            }
        })
        .into_owned()
}

/// Replaces rendered question-side cloze spans according to `mode`.
///
/// `Deleted` has nothing to work with here, since the deleted text is not
/// present in the rendered question, and behaves like `Anki`.
pub fn replace_rendered(text: &str, mode: ClozeMode) -> String {
    CLOZE_RENDERED
        .replace_all(text, |caps: &Captures| {
            let inner = &caps[1];
            match mode {
                ClozeMode::Ellipsize => ELLIPSIS.to_string(),
                ClozeMode::Remove => String::new(),
                ClozeMode::Wrap => wrapped(inner).unwrap_or_else(|| inner.to_string()),
                ClozeMode::Anki | ClozeMode::Deleted => inner.to_string(),
            }
        })
        .into_owned()
}

/// How much surrounding text to keep around a revealed cloze.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealContext {
    /// Number of words to keep before each revealed span.
    pub before: usize,
    /// Characters that, ending a word, stop the before window.
    pub before_until: Vec<char>,
    /// Number of words to keep after each revealed span.
    pub after: usize,
    /// Characters that, ending a word, stop the after window.
    pub after_until: Vec<char>,
}

impl RevealContext {
    pub fn wants_context(&self) -> bool {
        self.before > 0 || self.after > 0
    }
}

fn ends_with_any(token: &str, chars: &[char]) -> bool {
    token.chars().last().is_some_and(|c| chars.contains(&c))
}

fn context_before(markup_before: &str, ctx: &RevealContext) -> String {
    let text = markup::to_plain_text(markup_before);
    if text.is_empty() {
        return String::new();
    }

    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    if !ctx.before_until.is_empty() {
        // scan outward from the cloze, i.e. from the end
        if let Some(cut) = tokens.iter().rposition(|t| ends_with_any(t, &ctx.before_until)) {
            tokens = tokens.split_off(cut + 1);
        }
    }

    let keep_from = tokens.len().saturating_sub(ctx.before);
    let mut joined = tokens[keep_from..].join(" ");
    if text.ends_with(char::is_whitespace) {
        joined.push(' ');
    }
    joined
}

fn context_after(markup_after: &str, ctx: &RevealContext) -> String {
    let text = markup::to_plain_text(markup_after);
    if text.is_empty() {
        return String::new();
    }

    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    if !ctx.after_until.is_empty() {
        if let Some(cut) = tokens.iter().position(|t| ends_with_any(t, &ctx.after_until)) {
            tokens.truncate(cut + 1);
        }
    }

    tokens.truncate(ctx.after);
    let joined = tokens.join(" ");
    if text.starts_with(char::is_whitespace) {
        format!(" {}", joined)
    } else {
        joined
    }
}

/// Extracts only the revealed cloze text from answer-side markup, with
/// optional word windows before and after each span.
///
/// Input without any `cloze` span is returned unchanged. When spans are
/// found the result is plain text; none of the surrounding markup survives.
pub fn extract_revealed(markup: &str, ctx: &RevealContext) -> String {
    let spans = markup::find_elements(markup, "span", "cloze");
    if spans.is_empty() {
        return markup.to_string();
    }

    let revealed: Vec<String> = spans
        .iter()
        .map(|span| {
            let mut text = markup::strip_html(&markup[span.inner.clone()]);

            if ctx.before > 0 {
                let before = &markup[..span.outer.start];
                if !before.is_empty() {
                    text = context_before(before, ctx) + &text;
                }
            }

            if ctx.after > 0 {
                let after = &markup[span.outer.end..];
                if !after.is_empty() {
                    text.push_str(&context_after(after, ctx));
                }
            }

            text
        })
        .collect();

    revealed.join(" ... ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braced_modes() {
        let text = "Capital: {{c1::Paris::city}}.";
        assert_eq!(replace_braced(text, ClozeMode::Anki), "Capital: city.");
        assert_eq!(replace_braced(text, ClozeMode::Deleted), "Capital: Paris.");
        assert_eq!(replace_braced(text, ClozeMode::Wrap), "Capital: ... city ....");
        assert_eq!(replace_braced(text, ClozeMode::Ellipsize), "Capital: ....");
        assert_eq!(replace_braced(text, ClozeMode::Remove), "Capital: .");
    }

    #[test]
    fn braced_without_hint() {
        let text = "{{c2::Paris}} is nice";
        assert_eq!(replace_braced(text, ClozeMode::Anki), "... is nice");
        assert_eq!(replace_braced(text, ClozeMode::Wrap), "... is nice");
        assert_eq!(replace_braced(text, ClozeMode::Deleted), "Paris is nice");
        assert_eq!(replace_braced("{{c1::..::...}}", ClozeMode::Wrap), "...");
    }

    #[test]
    fn rendered_modes() {
        let text = "It is <span class=cloze>[city]</span>!";
        assert_eq!(replace_rendered(text, ClozeMode::Anki), "It is city!");
        assert_eq!(replace_rendered(text, ClozeMode::Wrap), "It is ... city ...!");
        assert_eq!(replace_rendered(text, ClozeMode::Remove), "It is !");
        let hidden = "<span class=cloze>[...]</span>";
        assert_eq!(replace_rendered(hidden, ClozeMode::Wrap), "...");
    }

    #[test]
    fn revealed_without_spans_is_unchanged() {
        let text = "<b>plain</b>";
        assert_eq!(extract_revealed(text, &RevealContext::default()), text);
    }

    #[test]
    fn revealed_with_before_context() {
        let ctx = RevealContext {
            before: 2,
            ..Default::default()
        };
        let text = "The quick brown <span class=cloze>fox</span>";
        assert_eq!(extract_revealed(text, &ctx), "quick brown fox");
    }

    #[test]
    fn revealed_with_boundaries() {
        let ctx = RevealContext {
            before: 5,
            before_until: vec!['.'],
            after: 5,
            after_until: vec![',', '.'],
        };
        let text = "First sentence. Then <span class=cloze>this</span> word, and more.";
        assert_eq!(extract_revealed(text, &ctx), "Then this word,");
    }

    #[test]
    fn multiple_spans_joined() {
        let ctx = RevealContext {
            after: 1,
            ..Default::default()
        };
        let text = "<span class=cloze>one</span>x y <span class=cloze>two</span> z";
        assert_eq!(extract_revealed(text, &ctx), "onex ... two z");
    }
}
