//! Naming strategies: deterministic identifier -> JSON key derivation.
//!
//! A [`Strategy`] is fixed per type or enum at construction time and never
//! mutated afterwards. Key derivation is a pure, total function, which is
//! what allows key tables to be built once, cached process-wide, and compared
//! for equality.

use serde::{Deserialize, Serialize};

/// Rule for converting a host identifier into a JSON key.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Strategy {
    /// Keep identifiers exactly as written in the source.
    #[default]
    Identity,
    /// Split on inferred word boundaries, lowercase, and join with `_`.
    Underscore,
}

/// Derive the JSON key for an identifier under the given strategy.
///
/// Total and deterministic. For [`Strategy::Underscore`] the result is
/// idempotent: `derive_key(derive_key(x)) == derive_key(x)`.
#[must_use]
pub fn derive_key(identifier: &str, strategy: Strategy) -> String {
    match strategy {
        Strategy::Identity => identifier.to_string(),
        Strategy::Underscore => underscore(identifier),
    }
}

/// Word-boundary split, lowercase, `_`-join.
///
/// Boundaries are inserted:
/// - before an uppercase preceded by a lowercase or digit (`helloWorld`),
/// - before the last uppercase of an uppercase run followed by a lowercase
///   (`HTTPServer` -> `http_server`),
/// - between a letter run and a digit run, in both directions
///   (`user2id` -> `user_2_id`).
///
/// Existing underscores act as boundaries and are never doubled, so
/// already-underscored input passes through unchanged.
fn underscore(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let mut out = String::with_capacity(identifier.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c != '_' {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            if prev != '_' && is_boundary(prev, c, next) {
                out.push('_');
            }
        }
        if c.is_uppercase() {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

fn is_boundary(prev: char, current: char, next: Option<char>) -> bool {
    let upper_after_lower_or_digit =
        current.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit());
    let acronym_end =
        current.is_uppercase() && prev.is_uppercase() && next.is_some_and(char::is_lowercase);
    let digit_after_letter = current.is_ascii_digit() && prev.is_alphabetic();
    let letter_after_digit = current.is_alphabetic() && prev.is_ascii_digit();

    upper_after_lower_or_digit || acronym_end || digit_after_letter || letter_after_digit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_leaves_identifier_unchanged() {
        assert_eq!(derive_key("HelloWorld", Strategy::Identity), "HelloWorld");
        assert_eq!(derive_key("snake_case", Strategy::Identity), "snake_case");
    }

    #[test]
    fn test_underscore_splits_camel_case() {
        assert_eq!(derive_key("HelloWorld", Strategy::Underscore), "hello_world");
        assert_eq!(derive_key("helloWorld", Strategy::Underscore), "hello_world");
        assert_eq!(derive_key("createdAt", Strategy::Underscore), "created_at");
    }

    #[test]
    fn test_underscore_handles_acronym_runs() {
        assert_eq!(derive_key("HTTPServer", Strategy::Underscore), "http_server");
        assert_eq!(derive_key("parseURL", Strategy::Underscore), "parse_url");
        assert_eq!(derive_key("ABC", Strategy::Underscore), "abc");
    }

    #[test]
    fn test_underscore_splits_digit_runs() {
        assert_eq!(derive_key("user2id", Strategy::Underscore), "user_2_id");
        assert_eq!(derive_key("userID2", Strategy::Underscore), "user_id_2");
        assert_eq!(derive_key("HTTP2Server", Strategy::Underscore), "http_2_server");
        assert_eq!(derive_key("a12b", Strategy::Underscore), "a_12_b");
    }

    #[test]
    fn test_underscore_preserves_existing_underscores() {
        assert_eq!(derive_key("hello_world", Strategy::Underscore), "hello_world");
        assert_eq!(derive_key("_leading", Strategy::Underscore), "_leading");
        assert_eq!(derive_key("trailing_", Strategy::Underscore), "trailing_");
    }

    #[test]
    fn test_underscore_single_letters() {
        assert_eq!(derive_key("A", Strategy::Underscore), "a");
        assert_eq!(derive_key("a", Strategy::Underscore), "a");
        assert_eq!(derive_key("", Strategy::Underscore), "");
    }

    #[test]
    fn test_underscore_is_idempotent_on_samples() {
        for input in ["HelloWorld", "HTTPServer", "userID2", "a12b", "_x_", "ABCdef"] {
            let once = derive_key(input, Strategy::Underscore);
            let twice = derive_key(&once, Strategy::Underscore);
            assert_eq!(once, twice, "not idempotent for {input}");
        }
    }
}
