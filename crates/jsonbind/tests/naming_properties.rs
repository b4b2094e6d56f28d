//! Property-based tests for naming-strategy invariants using proptest.
//!
//! Invariants tested:
//! - Underscore derivation is idempotent
//! - Identity derivation is the identity function
//! - Underscore output never contains uppercase and never doubles separators

#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use jsonbind::{derive_key, Strategy};
use proptest::prelude::*;

/// Optimized proptest config for naming property tests.
fn naming_config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        max_shrink_iters: 512,
        ..ProptestConfig::default()
    }
}

proptest! {
    #![proptest_config(naming_config())]

    #[test]
    fn prop_underscore_is_idempotent(ident in "[A-Za-z][A-Za-z0-9_]{0,24}") {
        let once = derive_key(&ident, Strategy::Underscore);
        let twice = derive_key(&once, Strategy::Underscore);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_identity_is_the_identity(ident in "[A-Za-z][A-Za-z0-9_]{0,24}") {
        prop_assert_eq!(derive_key(&ident, Strategy::Identity), ident);
    }

    #[test]
    fn prop_underscore_output_is_lowercase(ident in "[A-Za-z][A-Za-z0-9_]{0,24}") {
        let derived = derive_key(&ident, Strategy::Underscore);
        prop_assert!(!derived.chars().any(char::is_uppercase));
    }

    #[test]
    fn prop_underscore_never_doubles_separators(ident in "[A-Za-z][A-Za-z0-9]{0,24}") {
        let derived = derive_key(&ident, Strategy::Underscore);
        prop_assert!(!derived.contains("__"));
    }

    #[test]
    fn prop_derivation_is_deterministic(ident in "[A-Za-z][A-Za-z0-9_]{0,24}") {
        prop_assert_eq!(
            derive_key(&ident, Strategy::Underscore),
            derive_key(&ident, Strategy::Underscore)
        );
    }
}

#[test]
fn underscore_matches_reference_cases() {
    let cases = [
        ("HelloWorld", "hello_world"),
        ("helloWorld", "hello_world"),
        ("HTTPServer", "http_server"),
        ("userID2", "user_id_2"),
        ("already_snake", "already_snake"),
        ("A", "a"),
    ];
    for (input, expected) in cases {
        assert_eq!(derive_key(input, Strategy::Underscore), expected);
    }
}
