use std::sync::LazyLock;

use regex::Regex;

/// Typographic characters folded to their plain ASCII spelling.
const SMART_PUNCTUATION: &[(char, &str)] = &[
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2026}', "..."),
];

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern"));

/// Clean extracted text so it can be stored and compared safely.
///
/// Strips NULs and control characters, turns line breaks and tabs into
/// spaces, folds smart quotes/dashes/ellipses to ASCII and collapses
/// whitespace. Applying it twice gives the same result as applying it once.
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\0' => {}
            '\r' | '\n' | '\t' => folded.push(' '),
            _ => match SMART_PUNCTUATION.iter().find(|(smart, _)| *smart == c) {
                Some((_, plain)) => folded.push_str(plain),
                None if c.is_control() => {}
                None => folded.push(c),
            },
        }
    }

    WHITESPACE_RUN.replace_all(&folded, " ").trim().to_string()
}

/// Keep at most `max` characters (not bytes) of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
