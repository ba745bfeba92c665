//! Identifier validation shared by the validator, the patch applier, and
//! code emission.
//!
//! The rule is deliberately narrow: non-empty, first character not a digit,
//! only ASCII alphanumerics and underscores. Anything looser would let
//! generated names leak into emitted source unchecked.

/// Returns `true` if `s` is a valid identifier.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        None => false,
        Some(c) if c.is_ascii_digit() => false,
        Some(c) if !c.is_ascii_alphanumeric() && c != '_' => false,
        Some(_) => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert!(is_valid_identifier("UserService"));
        assert!(is_valid_identifier("create_user"));
        assert!(is_valid_identifier("_private"));
        assert!(is_valid_identifier("a"));
        assert!(is_valid_identifier("x2"));
    }

    #[test]
    fn rejects_empty() {
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn rejects_leading_digit() {
        assert!(!is_valid_identifier("123Bad"));
        assert!(!is_valid_identifier("9"));
    }

    #[test]
    fn rejects_punctuation_and_whitespace() {
        assert!(!is_valid_identifier("user-service"));
        assert!(!is_valid_identifier("user service"));
        assert!(!is_valid_identifier("user.service"));
        assert!(!is_valid_identifier("émail"));
    }

    proptest! {
        #[test]
        fn accepts_generated_identifiers(s in "[a-zA-Z_][a-zA-Z0-9_]{0,24}") {
            prop_assert!(is_valid_identifier(&s));
        }

        #[test]
        fn rejects_digit_prefixed(s in "[0-9][a-zA-Z0-9_]{0,24}") {
            prop_assert!(!is_valid_identifier(&s));
        }
    }
}
