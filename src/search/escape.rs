// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metacharacter escaping for literal tokens placed inside clauses.
//!
//! Each reserved character gets a `\` prefix in a single left-to-right pass,
//! so a backslash inserted for one character is never escaped again.
//! Escaping is not idempotent: escaping already-escaped text escapes the
//! backslashes too.
//!
//! ```
//! use movie_search::search::escape;
//!
//! assert_eq!(escape("a-b{c}"), r"a\-b\{c\}");
//! assert_eq!(escape(r"a\-b"), r"a\\\-b");
//! ```

/// Characters the query language reserves.
pub const META_CHARACTERS: [char; 19] = [
    '\\', '^', '$', '{', '}', '[', ']', '(', ')', '.', '*', '+', '?', '|', '<', '>', '-', '&', '%',
];

/// Escape every reserved character in `token`. Spaces are kept.
pub fn escape(token: &str) -> String {
    let mut escaped = String::with_capacity(token.len());
    for c in token.chars() {
        match c {
            '\\' | '^' | '$' | '{' | '}' | '[' | ']' | '(' | ')' | '.' | '*' | '+' | '?' | '|'
            | '<' | '>' | '-' | '&' | '%' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_braces_and_dash() {
        assert_eq!(escape("a-b{c}"), "a\\-b\\{c\\}");
    }

    #[test]
    fn test_escape_plain_token_unchanged() {
        assert_eq!(escape("Scarlett Johansson"), "Scarlett Johansson");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_escape_every_meta_character() {
        for c in META_CHARACTERS {
            let escaped = escape(&c.to_string());
            assert_eq!(escaped, format!("\\{}", c), "character {:?}", c);
        }
    }

    #[test]
    fn test_backslash_not_reescaped() {
        // One backslash in, two out; the dash gets its own prefix
        assert_eq!(escape("\\-"), "\\\\\\-");
    }

    #[test]
    fn test_double_escape_is_not_idempotent() {
        let once = escape("Sci-Fi");
        assert_eq!(once, "Sci\\-Fi");
        assert_eq!(escape(&once), "Sci\\\\\\-Fi");
    }

    #[test]
    fn test_unicode_passthrough() {
        assert_eq!(escape("Amélie (2001)"), "Amélie \\(2001\\)");
    }
}
