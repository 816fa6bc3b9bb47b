//! Just enough markup handling for the rules: locating elements by tag name
//! and class, and flattening markup to plain text.
//!
//! This is not an HTML parser. Tags are found with a permissive pattern and
//! elements are matched by counting same-named start and end tags, so
//! unclosed elements simply run to the end of the input.

use std::ops::Range;

use crate::patterns::{
    CLASS_ATTR, HTML_COMMENT, HTML_SCRIPT, HTML_STYLE, HTML_TAG, LINEBREAK_HTML, MARKUP_TAG,
};

/// Byte offsets of one element in the markup it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpan {
    /// From the start of the opening tag to the end of the closing tag.
    pub outer: Range<usize>,
    /// Between the opening and closing tags.
    pub inner: Range<usize>,
}

fn has_class(attrs: &str, class: &str) -> bool {
    CLASS_ATTR.captures_iter(attrs).any(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .is_some_and(|value| value.as_str().split_whitespace().any(|token| token == class))
    })
}

/// Finds every outermost `tag` element whose class list contains `class`,
/// in document order.
///
/// Elements nested inside a match are part of that match and are not
/// reported separately.
pub fn find_elements(markup: &str, tag: &str, class: &str) -> Vec<ElementSpan> {
    let mut found = Vec::new();
    // (start of opening tag, start of content, nesting depth)
    let mut open: Option<(usize, usize, usize)> = None;
    let comments: Vec<Range<usize>> = HTML_COMMENT.find_iter(markup).map(|m| m.range()).collect();

    for caps in MARKUP_TAG.captures_iter(markup) {
        let Some(whole) = caps.get(0) else { continue };
        if comments.iter().any(|c| c.contains(&whole.start())) {
            continue;
        }
        if !caps[2].eq_ignore_ascii_case(tag) {
            continue;
        }
        let closing = caps.get(1).is_some();
        let attrs = caps.get(3).map_or("", |m| m.as_str());
        let self_closing = attrs.trim_end().ends_with('/');

        match open.as_mut() {
            None => {
                if closing || !has_class(attrs, class) {
                    continue;
                }
                if self_closing {
                    found.push(ElementSpan {
                        outer: whole.start()..whole.end(),
                        inner: whole.end()..whole.end(),
                    });
                } else {
                    open = Some((whole.start(), whole.end(), 1));
                }
            }
            Some((start, content_start, depth)) => {
                if closing {
                    *depth -= 1;
                    if *depth == 0 {
                        found.push(ElementSpan {
                            outer: *start..whole.end(),
                            inner: *content_start..whole.start(),
                        });
                        open = None;
                    }
                } else if !self_closing {
                    *depth += 1;
                }
            }
        }
    }

    if let Some((start, content_start, _)) = open {
        found.push(ElementSpan {
            outer: start..markup.len(),
            inner: content_start..markup.len(),
        });
    }

    found
}

/// Removes comments, style and script blocks and all tags, then decodes
/// character entities. Non-breaking space entities become plain spaces.
pub fn strip_html(markup: &str) -> String {
    let text = HTML_COMMENT.replace_all(markup, "");
    let text = HTML_STYLE.replace_all(&text, "");
    let text = HTML_SCRIPT.replace_all(&text, "");
    let text = HTML_TAG.replace_all(&text, "");
    let text = text.replace("&nbsp;", " ");
    html_escape::decode_html_entities(&text).into_owned()
}

/// Converts markup to plain text, turning line-break-ish tags into spaces
/// first so adjacent blocks do not run together.
pub fn to_plain_text(markup: &str) -> String {
    strip_html(&LINEBREAK_HTML.replace_all(markup, " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_elements_by_class_token() {
        let html = r#"a <span class="x cloze">b</span> c <span class=other>d</span>"#;
        let spans = find_elements(html, "span", "cloze");
        assert_eq!(spans.len(), 1);
        assert_eq!(&html[spans[0].inner.clone()], "b");
        assert_eq!(&html[spans[0].outer.clone()], r#"<span class="x cloze">b</span>"#);
    }

    #[test]
    fn nested_same_tag_is_balanced() {
        let html = "<div class=hint>a<div>b</div>c</div>tail";
        let spans = find_elements(html, "div", "hint");
        assert_eq!(spans.len(), 1);
        assert_eq!(&html[spans[0].inner.clone()], "a<div>b</div>c");
        assert_eq!(&html[spans[0].outer.end..], "tail");
    }

    #[test]
    fn unclosed_element_runs_to_end() {
        let html = "x<SPAN CLASS='cloze'>y z";
        let spans = find_elements(html, "span", "cloze");
        assert_eq!(spans.len(), 1);
        assert_eq!(&html[spans[0].inner.clone()], "y z");
        assert_eq!(spans[0].outer.end, html.len());
    }

    #[test]
    fn bare_angle_bracket_is_not_a_tag() {
        let html = "if x < y then <span class=cloze>fox</span> wins";
        let spans = find_elements(html, "span", "cloze");
        assert_eq!(spans.len(), 1);
        assert_eq!(&html[spans[0].inner.clone()], "fox");

        let html = "a </ b <div class=hint>h</div>";
        let spans = find_elements(html, "div", "hint");
        assert_eq!(spans.len(), 1);
        assert_eq!(&html[spans[0].inner.clone()], "h");
    }

    #[test]
    fn tags_inside_comments_are_ignored() {
        let html = "<!-- <span class=cloze>old</span> --><span class=cloze>new</span>";
        let spans = find_elements(html, "span", "cloze");
        assert_eq!(spans.len(), 1);
        assert_eq!(&html[spans[0].inner.clone()], "new");

        assert!(find_elements("<!-- <span class=cloze>x</span> -->", "span", "cloze").is_empty());
    }

    #[test]
    fn strip_html_decodes_entities() {
        assert_eq!(strip_html("<b>Fish</b> &amp; chips&nbsp;!"), "Fish & chips !");
        assert_eq!(strip_html("a<!-- note -->b<style>p{}</style>c"), "abc");
    }

    #[test]
    fn plain_text_separates_blocks() {
        assert_eq!(to_plain_text("one<br>two<div>three</div>"), "one two three ");
    }
}
