//! Removal of delimited, possibly nested, substrings such as `(asides)`,
//! `[notes]` and `{markup}`.

/// Removes every substring opened by `open` and terminated by a matching
/// `close`, nested pairs included.
///
/// A `close` with nothing open is kept as ordinary text. Content of levels
/// still open at the end of the input is appended back (without the opening
/// character), so an unmatched `open` never swallows text.
pub fn strip_within(text: &str, open: char, close: char) -> String {
    if !text.contains(open) {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut levels: Vec<String> = Vec::new();

    for c in text.chars() {
        if c == open {
            levels.push(String::new());
        } else if c == close {
            if levels.pop().is_none() {
                result.push(c);
            }
        } else if let Some(level) = levels.last_mut() {
            level.push(c);
        } else {
            result.push(c);
        }
    }

    for level in levels {
        result.push_str(&level);
    }
    result
}
