//! One-time PIN codes and the QR sign-in URL.

use crate::config::SignInConfig;
use crate::error::CredentialError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Symbols used in PIN codes.
pub const CODE_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Longest PIN the host accepts.
pub const MAX_PIN_LENGTH: usize = 12;

/// A PIN code shown on the sign-in screen.
///
/// Always 1 to 12 characters from `0-9A-Z`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Credential(String);

impl Credential {
    /// The code as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if the code has no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // Callers guarantee `code` is drawn from the alphabet.
    pub(crate) fn from_alphabet(mut code: String) -> Self {
        code.truncate(MAX_PIN_LENGTH);
        Self(code)
    }
}

impl TryFrom<String> for Credential {
    type Error = CredentialError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        if code.is_empty() {
            return Err(CredentialError::Empty);
        }
        if let Some(bad) = code.chars().find(|c| !is_code_char(*c)) {
            return Err(CredentialError::InvalidCharacter(bad));
        }
        if code.len() > MAX_PIN_LENGTH {
            return Err(CredentialError::TooLong {
                length: code.len(),
                max: MAX_PIN_LENGTH,
            });
        }
        Ok(Self(code))
    }
}

impl TryFrom<&str> for Credential {
    type Error = CredentialError;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        Self::try_from(code.to_string())
    }
}

impl From<Credential> for String {
    fn from(credential: Credential) -> Self {
        credential.0
    }
}

impl AsRef<str> for Credential {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const fn is_code_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_uppercase()
}

/// Random code of `length` symbols from `0-9A-Z`, drawn with replacement.
///
/// Not cryptographically secure; the code only pairs a phone with the car.
///
/// # Examples
///
/// ```
/// use car_templates_signin::credentials::generate_random_code;
///
/// let code = generate_random_code(12);
/// assert_eq!(code.len(), 12);
/// assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
/// ```
#[must_use]
pub fn generate_random_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())]))
        .collect()
}

/// URL encoded in the QR code.
#[must_use]
pub fn build_sign_in_url(config: &SignInConfig) -> Url {
    config.sign_in_url.clone()
}

/// Source of PIN codes.
///
/// Called on every entry into the PIN step; implementations must not cache.
pub trait CodeGenerator: Send + Sync {
    /// Produce a credential of `length` characters (clamped to 1..=12).
    fn generate(&self, length: usize) -> Credential;
}

/// [`CodeGenerator`] backed by [`generate_random_code`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, length: usize) -> Credential {
        let length = length.clamp(1, MAX_PIN_LENGTH);
        Credential::from_alphabet(generate_random_code(length))
    }
}
