//! The individual text transformations behind each rule.
//!
//! Every function here is a pure `&str -> String` mapping.

use regex::Captures;

use super::{CharSet, Counter, Substitution};
use crate::markup;
use crate::patterns::{
    ELLIPSES, ELLIPSES_LEADING, ELLIPSES_TRAILING, FILENAMES, FILENAME_PREFIX, HINT_LINK,
    NEWLINEISH, SOUNDS, WHITESPACE,
};

pub fn char_ellipsize(text: &str, chars: &CharSet) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if chars.contains(c) {
            result.push_str("...");
        } else {
            result.push(c);
        }
    }
    result
}

pub fn char_remove(text: &str, chars: &CharSet) -> String {
    text.chars().filter(|c| !chars.contains(*c)).collect()
}

/// Replaces each run of two or more counted characters with the run length.
pub fn counter(text: &str, counter: &Counter) -> String {
    let Some(runs) = counter.runs() else {
        return text.to_string();
    };
    runs.replace_all(text, |caps: &Captures| {
        let n = caps[0].chars().count();
        if counter.wrap {
            format!(" ... {} ... ", n)
        } else {
            format!(" {} ", n)
        }
    })
    .into_owned()
}

/// Applies each substitution in turn, normalizing whitespace and ellipses
/// before every one and stopping as soon as the text becomes empty.
pub fn custom_sub(text: &str, subs: &[Substitution]) -> String {
    let mut text = text.to_string();
    for sub in subs {
        text = whitespace(&ellipses(&text));
        if text.is_empty() {
            return text;
        }

        text = sub.apply(&text);
        if text.is_empty() {
            return text;
        }
    }
    text
}

/// Collapses runs of three or more periods into ` ... `, and drops such
/// runs entirely at the start or end of the text.
pub fn ellipses(text: &str) -> String {
    let text = ELLIPSES.replace_all(text, " ... ");
    let text = ELLIPSES_LEADING.replace(&text, "");
    ELLIPSES_TRAILING.replace(&text, "").into_owned()
}

pub fn filenames(text: &str) -> String {
    FILENAMES.replace_all(text, "").into_owned()
}

pub fn hint_content(text: &str) -> String {
    let hints = markup::find_elements(text, "div", "hint");
    if hints.is_empty() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut last_end = 0;
    for hint in hints {
        result.push_str(&text[last_end..hint.outer.start]);
        last_end = hint.outer.end;
    }
    result.push_str(&text[last_end..]);
    result
}

pub fn hint_links(text: &str) -> String {
    HINT_LINK.replace_all(text, "").into_owned()
}

pub fn html(text: &str) -> String {
    markup::to_plain_text(text)
}

pub fn newline_ellipsize(text: &str) -> String {
    NEWLINEISH.replace_all(text, " ... ").into_owned()
}

fn sounds_where(text: &str, remove: impl Fn(&str) -> bool) -> String {
    SOUNDS
        .replace_all(text, |caps: &Captures| {
            if remove(&caps[1]) {
                String::new()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

pub fn sounds_ours(text: &str) -> String {
    sounds_where(text, |name| FILENAME_PREFIX.is_match(name))
}

pub fn sounds_theirs(text: &str) -> String {
    sounds_where(text, |name| !FILENAME_PREFIX.is_match(name))
}

pub fn sounds_univ(text: &str) -> String {
    SOUNDS.replace_all(text, "").into_owned()
}

pub fn whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubstitutionSpec;

    const OURS: &str = "[sound:gtts-0123abcd-0123abcd-0123abcd-0123abcd-0123abcd.mp3]";
    const THEIRS: &str = "[sound:recording.ogg]";

    fn chars(s: &str) -> CharSet {
        s.chars().collect()
    }

    #[test]
    fn ellipses_collapse() {
        assert_eq!(ellipses("a....b"), "a ... b");
        assert_eq!(ellipses("a . . . b"), "a ... b");
        assert_eq!(ellipses("...."), "");
        assert_eq!(ellipses("... hello .. world ..."), "hello .. world");
    }

    #[test]
    fn whitespace_collapses_and_trims() {
        assert_eq!(whitespace("  a \t\n b\0\0c  "), "a b c");
        assert_eq!(whitespace(" \n "), "");
    }

    #[test]
    fn char_rules_work_per_character() {
        assert_eq!(char_ellipsize("a_b__c", &chars("_")), "a...b......c");
        assert_eq!(char_remove("a*b#c", &chars("*#")), "abc");
    }

    #[test]
    fn counter_counts_runs() {
        let plain = Counter::new(chars("x"), false).unwrap();
        assert_eq!(counter("axxxb", &plain), "a 3 b");
        assert_eq!(counter("axb", &plain), "axb");

        let wrapped = Counter::new(chars("_-"), true).unwrap();
        assert_eq!(counter("a_-_b", &wrapped), "a ... 3 ... b");

        let empty = Counter::new(CharSet::default(), false).unwrap();
        assert_eq!(counter("xxxx", &empty), "xxxx");
    }

    #[test]
    fn custom_sub_normalizes_between_entries() {
        let subs: Vec<Substitution> = [("dr.", "doctor"), ("doctor", "")]
            .iter()
            .map(|(input, replace)| {
                Substitution::compile(&SubstitutionSpec {
                    input: input.to_string(),
                    replace: replace.to_string(),
                    regex: false,
                    ignore_case: true,
                })
                .unwrap()
            })
            .collect();
        assert_eq!(custom_sub("  Dr.   Who ", &subs[..1]), "doctor Who");
        assert_eq!(custom_sub("Dr.", &subs), "");
    }

    #[test]
    fn html_strips_markup() {
        assert_eq!(html("a<br/>b <i>c</i> &lt;d&gt;"), "a b c <d>");
    }

    #[test]
    fn hints_are_removed() {
        let text = r#"Front<div class="hint">secret <b>x</b></div> back"#;
        assert_eq!(hint_content(text), "Front back");
        let link = r##"Front <a class=hint href="#" onclick="x">Show Hint</a>!"##;
        assert_eq!(hint_links(link), "Front !");
    }

    #[test]
    fn newlines_become_ellipses() {
        assert_eq!(newline_ellipsize("a\r\n\nb<br><br/>c"), "a ... b ... c");
    }

    #[test]
    fn sound_tag_filters() {
        let text = format!("a {} b {} c", OURS, THEIRS);
        assert_eq!(sounds_ours(&text), format!("a  b {} c", THEIRS));
        assert_eq!(sounds_theirs(&text), format!("a {} b  c", OURS));
        assert_eq!(sounds_univ(&text), "a  b  c");
    }

    #[test]
    fn filenames_removed() {
        assert_eq!(filenames("see ATTS hello (2).mp3"), "see ");
    }
}
