//! Precompiled patterns shared by every rule.
//!
//! All patterns are compiled once, on first use, and are read-only
//! afterwards, so they can be used from any number of threads.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Unrendered cloze placeholder, `{{c1::deleted}}` or `{{c1::deleted::hint}}`.
    /// Group 1 is the deleted text, group 3 the hint.
    pub static ref CLOZE_BRACED: Regex =
        Regex::new(r"(?s)\{\{c\d+::(.*?)(::(.*?))?\}\}").unwrap();

    /// Question-side rendered cloze, `<span class=cloze>[...]</span>`.
    /// Group 1 is the bracketed content.
    pub static ref CLOZE_RENDERED: Regex =
        Regex::new(r"<span class=.?cloze.?>\[(.+?)\]</span>").unwrap();

    /// Three or more periods, optionally separated by whitespace.
    pub static ref ELLIPSES: Regex = Regex::new(r"\s*(\.\s*){3,}").unwrap();
    pub static ref ELLIPSES_LEADING: Regex = Regex::new(r"^\s*(\.\s*){3,}").unwrap();
    pub static ref ELLIPSES_TRAILING: Regex = Regex::new(r"\s*(\.\s*){3,}$").unwrap();

    /// Filenames generated by the add-on: a service id followed by five
    /// hash groups, or the legacy `ATTS ...` form, with an optional
    /// duplicate counter.
    pub static ref FILENAMES: Regex =
        Regex::new(r"([a-z\d]+(-[a-f\d]{8}){5}|ATTS .+)( \(\d+\))?\.mp3").unwrap();

    /// Same shape as `FILENAMES`, anchored at the start of the haystack.
    pub static ref FILENAME_PREFIX: Regex =
        Regex::new(r"^(?:[a-z\d]+(?:-[a-f\d]{8}){5}|ATTS .+)(?: \(\d+\))?\.mp3").unwrap();

    pub static ref HINT_LINK: Regex =
        Regex::new(r"<a[^>]+class=.?hint.?[^>]*>[^<]+</a>").unwrap();

    pub static ref LINEBREAK_HTML: Regex =
        Regex::new(r"(?i)<\s*/?\s*(br|div|p)(\s+[^>]*)?\s*/?\s*>").unwrap();

    pub static ref NEWLINEISH: Regex =
        Regex::new(r"(?i)(\r|\n|<\s*/?\s*(br|div|p)(\s+[^>]*)?\s*/?\s*>)+").unwrap();

    /// Embedded sound reference; group 1 is the filename.
    pub static ref SOUNDS: Regex = Regex::new(r"\[sound:(.*?)\]").unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"[\x00\s]+").unwrap();

    pub static ref HTML_COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();
    pub static ref HTML_STYLE: Regex = Regex::new(r"(?si)<style.*?>.*?</style>").unwrap();
    pub static ref HTML_SCRIPT: Regex = Regex::new(r"(?si)<script.*?>.*?</script>").unwrap();
    pub static ref HTML_TAG: Regex = Regex::new(r"(?s)<.*?>").unwrap();

    /// One start or end tag. Group 1 is the closing slash, group 2 the tag
    /// name, group 3 the raw attribute text.
    pub static ref MARKUP_TAG: Regex = Regex::new(
        r#"<(/)?([A-Za-z][A-Za-z0-9-]*)((?:[^<>"']|"[^"]*"|'[^']*')*)>"#
    ).unwrap();

    /// Numbered group reference in a replacement, or an escaped `$$`.
    pub static ref GROUP_REF: Regex = Regex::new(r"\$\$|\$(\d+)").unwrap();

    /// `class` attribute in double-quoted, single-quoted or bare form.
    pub static ref CLASS_ATTR: Regex = Regex::new(
        r#"(?i)(?:^|\s)class\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+))"#
    ).unwrap();
}
