use sha2::{Digest, Sha256};

use super::truncate_chars;

/// Number of leading content characters that take part in the fingerprint.
pub const HASH_WINDOW: usize = 200;

/// Stable dedup key for an article: title plus the start of its content,
/// both trimmed and lowercased.
pub fn fingerprint(title: &str, content: &str) -> String {
    let snippet = truncate_chars(content, HASH_WINDOW);

    let mut hasher = Sha256::new();
    hasher.update(title.trim().to_lowercase().as_bytes());
    hasher.update(snippet.trim().to_lowercase().as_bytes());
    hex::encode(&hasher.finalize()[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_stable_across_calls() {
        let a = fingerprint("OpenAI ships a model", "Some body text");
        let b = fingerprint("OpenAI ships a model", "Some body text");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn ignores_case_and_outer_whitespace() {
        assert_eq!(
            fingerprint("  OpenAI Ships ", "BODY "),
            fingerprint("openai ships", "body")
        );
    }

    #[test]
    fn changes_with_title_or_content_window() {
        let base = fingerprint("title", "content");
        assert_ne!(base, fingerprint("title 2", "content"));
        assert_ne!(base, fingerprint("title", "content 2"));
    }

    #[test]
    fn only_first_window_of_content_counts() {
        let head = "x".repeat(HASH_WINDOW);
        let a = fingerprint("t", &format!("{head}tail one"));
        let b = fingerprint("t", &format!("{head}tail two"));
        assert_eq!(a, b);

        let c = fingerprint("t", &format!("y{}", &head[1..]));
        assert_ne!(a, c);
    }
}
