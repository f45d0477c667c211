//! Email and password format checks.
//!
//! Both validators run their checks in a fixed order and report the first
//! failure. Lengths are counted in characters, not bytes.

use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

/// Shortest accepted email address, in characters.
pub const MIN_EMAIL_LENGTH: usize = 7;

/// Accepted password lengths, in characters.
pub const PASSWORD_LENGTH: std::ops::RangeInclusive<usize> = 8..=14;

/// Characters that satisfy the special-character rule.
pub const SPECIAL_CHARACTERS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";

static EMAIL_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).ok());

/// Check an email address.
///
/// In order: blank input, fewer than 7 characters, then the
/// `local@domain.tld` shape.
///
/// # Examples
///
/// ```
/// use car_templates_signin::validation::validate_email;
/// use car_templates_signin::ValidationError;
///
/// assert_eq!(validate_email("ab@cd.com"), None);
/// assert_eq!(validate_email("a@b.co"), Some(ValidationError::TooShort));
/// assert_eq!(validate_email("   "), Some(ValidationError::EmptyInput));
/// ```
#[must_use]
pub fn validate_email(email: &str) -> Option<ValidationError> {
    if email.trim().is_empty() {
        return Some(ValidationError::EmptyInput);
    }

    if email.chars().count() < MIN_EMAIL_LENGTH {
        return Some(ValidationError::TooShort);
    }

    let matches = EMAIL_REGEX
        .as_ref()
        .is_some_and(|regex| regex.is_match(email));
    if !matches {
        return Some(ValidationError::InvalidFormat);
    }

    None
}

/// Check a password.
///
/// In order: blank input, length outside 8..=14, then a digit, a special
/// character, an uppercase letter and a lowercase letter must be present.
///
/// # Examples
///
/// ```
/// use car_templates_signin::validation::validate_password;
/// use car_templates_signin::ValidationError;
///
/// assert_eq!(validate_password("Abcdef1!"), None);
/// assert_eq!(validate_password("abcdefgh"), Some(ValidationError::MissingDigit));
/// ```
#[must_use]
pub fn validate_password(password: &str) -> Option<ValidationError> {
    if password.trim().is_empty() {
        return Some(ValidationError::EmptyInput);
    }

    if !PASSWORD_LENGTH.contains(&password.chars().count()) {
        return Some(ValidationError::InvalidLength);
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some(ValidationError::MissingDigit);
    }

    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Some(ValidationError::MissingSpecialChar);
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Some(ValidationError::MissingUppercase);
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Some(ValidationError::MissingLowercase);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_emails() {
        assert_eq!(validate_email("ab@cd.com"), None);
        assert_eq!(validate_email("user@example.com"), None);
        assert_eq!(validate_email("first.last+tag@mail.example.co.uk"), None);
        assert_eq!(validate_email("x_y%z@host-name.io"), None);
    }

    #[test]
    fn test_email_check_order() {
        assert_eq!(validate_email(""), Some(ValidationError::EmptyInput));
        assert_eq!(validate_email(" \t "), Some(ValidationError::EmptyInput));
        // Too short wins over bad format
        assert_eq!(validate_email("abc"), Some(ValidationError::TooShort));
        assert_eq!(validate_email("a@b.co"), Some(ValidationError::TooShort));
        assert_eq!(validate_email("not-an-email"), Some(ValidationError::InvalidFormat));
    }

    #[test]
    fn test_invalid_email_formats() {
        for email in [
            "user@example",
            "user@example.c",
            "@example.com",
            "user example@test.com",
            "user@exa mple.com",
            "user@@example.com",
            " user@example.com",
            "user@example.c0m",
        ] {
            assert_eq!(
                validate_email(email),
                Some(ValidationError::InvalidFormat),
                "{email:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_email_length_counts_characters() {
        // 7 characters, 8 bytes: long enough, but fails the format check
        assert_eq!(validate_email("é@b.com"), Some(ValidationError::InvalidFormat));
        assert_eq!(validate_email("é@b.co"), Some(ValidationError::TooShort));
    }

    #[test]
    fn test_valid_passwords() {
        assert_eq!(validate_password("Abcdef1!"), None);
        assert_eq!(validate_password("StrongP1!"), None);
        assert_eq!(validate_password("Zz9\\aaaaaaaaaa"), None);
    }

    #[test]
    fn test_password_check_order() {
        assert_eq!(validate_password(""), Some(ValidationError::EmptyInput));
        assert_eq!(validate_password("    "), Some(ValidationError::EmptyInput));
        assert_eq!(validate_password("Ab1!"), Some(ValidationError::InvalidLength));
        assert_eq!(
            validate_password("Abcdefgh1!abcde"),
            Some(ValidationError::InvalidLength)
        );
        assert_eq!(validate_password("abcdefgh"), Some(ValidationError::MissingDigit));
        assert_eq!(
            validate_password("abcdefg1"),
            Some(ValidationError::MissingSpecialChar)
        );
        assert_eq!(
            validate_password("abcdef1!"),
            Some(ValidationError::MissingUppercase)
        );
        assert_eq!(
            validate_password("ABCDEF1!"),
            Some(ValidationError::MissingLowercase)
        );
    }

    #[test]
    fn test_password_length_bounds() {
        assert_eq!(validate_password("Abcde1!"), Some(ValidationError::InvalidLength));
        assert_eq!(validate_password("Abcdef1!"), None);
        assert_eq!(validate_password("Abcdefghijk1!"), None);
        assert_eq!(validate_password("Abcdefghijkl1!"), None);
        assert_eq!(
            validate_password("Abcdefghijklm1!"),
            Some(ValidationError::InvalidLength)
        );
    }

    #[test]
    fn test_every_special_character_counts() {
        for special in SPECIAL_CHARACTERS.chars() {
            let password = format!("Abcdefg1{special}");
            assert_eq!(validate_password(&password), None, "{special:?} should count");
        }
    }

    #[test]
    fn test_space_is_not_special() {
        assert_eq!(
            validate_password("Abcd efg1"),
            Some(ValidationError::MissingSpecialChar)
        );
    }

    proptest! {
        #[test]
        fn blank_input_is_empty_for_both(blank in "[ \t\n]{0,20}") {
            prop_assert_eq!(validate_email(&blank), Some(ValidationError::EmptyInput));
            prop_assert_eq!(validate_password(&blank), Some(ValidationError::EmptyInput));
        }

        #[test]
        fn well_formed_emails_pass(
            local in "[a-z0-9._%+-]{3,12}",
            domain in "[a-z0-9-]{1,12}",
            tld in "[a-z]{2,6}",
        ) {
            let email = format!("{local}@{domain}.{tld}");
            prop_assert_eq!(validate_email(&email), None);
        }

        #[test]
        fn emails_without_at_sign_fail(text in "[a-z.]{7,30}") {
            prop_assert_eq!(validate_email(&text), Some(ValidationError::InvalidFormat));
        }

        #[test]
        fn long_passwords_fail_on_length(password in "[A-Za-z0-9!]{15,40}") {
            prop_assert_eq!(validate_password(&password), Some(ValidationError::InvalidLength));
        }

        #[test]
        fn passwords_with_all_classes_pass(
            upper in "[A-Z]{1,2}",
            lower in "[a-z]{1,2}",
            digit in "[0-9]{1,2}",
            special in "[!@#$%^&*?]{1,2}",
            filler in "[a-z]{4}",
        ) {
            let password = format!("{upper}{lower}{digit}{special}{filler}");
            prop_assert_eq!(validate_password(&password), None);
        }
    }
}
