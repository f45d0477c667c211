//! Error types for the sign-in flow.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Why a submitted email or password was rejected.
///
/// These are values attached to the current sign-in step, never propagated
/// as failures. The `Display` text is the message shown under the input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationError {
    /// Input is blank.
    #[error("This field cannot be empty")]
    EmptyInput,

    /// Email is shorter than 7 characters.
    #[error("Email address is too short")]
    TooShort,

    /// Email does not look like `local@domain.tld`.
    #[error("Enter a valid email address")]
    InvalidFormat,

    /// Password is not 8 to 14 characters long.
    #[error("Password must be between 8 and 14 characters")]
    InvalidLength,

    /// Password has no digit.
    #[error("Password must contain at least one digit")]
    MissingDigit,

    /// Password has no special character.
    #[error("Password must contain at least one special character")]
    MissingSpecialChar,

    /// Password has no uppercase letter.
    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    /// Password has no lowercase letter.
    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,
}

impl ValidationError {
    /// Message shown to the user.
    #[must_use]
    pub fn user_message(self) -> String {
        self.to_string()
    }
}

/// Rejected sign-in configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The sign-in URL does not parse.
    #[error("Invalid sign-in URL {value:?}: {reason}")]
    InvalidUrl {
        /// Raw value
        value: String,
        /// Parser message
        reason: String,
    },

    /// The sign-in URL is not http(s).
    #[error("Sign-in URL must use http or https, got {scheme:?}")]
    UnsupportedScheme {
        /// Scheme found in the URL
        scheme: String,
    },

    /// A numeric setting does not parse.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidNumber {
        /// Environment variable name
        name: &'static str,
        /// Raw value
        value: String,
    },

    /// PIN length outside `1..=12`.
    #[error("PIN length must be between 1 and {max}, got {length}")]
    PinLength {
        /// Requested length
        length: usize,
        /// Largest allowed length
        max: usize,
    },
}

/// Rejected credential text.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    /// Empty code.
    #[error("Credential cannot be empty")]
    Empty,

    /// Code longer than the host accepts.
    #[error("Credential has {length} characters, at most {max} allowed")]
    TooLong {
        /// Actual length
        length: usize,
        /// Largest allowed length
        max: usize,
    },

    /// Character outside `0-9A-Z`.
    #[error("Credential contains {0:?}, only 0-9 and A-Z are allowed")]
    InvalidCharacter(char),
}
