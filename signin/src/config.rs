//! Sign-in configuration.
//!
//! Values come from the application (or the environment via
//! [`SignInConfig::from_env`]), never from the reducer.

use crate::credentials::MAX_PIN_LENGTH;
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use url::Url;

/// URL encoded in the QR code when none is configured.
pub const DEFAULT_SIGN_IN_URL: &str = "https://www.example.com/sign-in";

/// Host API level assumed when none is configured.
pub const DEFAULT_API_LEVEL: u32 = 8;

/// Lowest host API level that can show the sign-in template.
pub const MIN_SIGN_IN_API_LEVEL: u32 = 2;

/// Hosts above this level get the QR code method instead of the PIN.
pub const QR_CODE_API_LEVEL_THRESHOLD: u32 = 3;

const SIGN_IN_URL_VAR: &str = "CAR_SIGN_IN_URL";
const PIN_LENGTH_VAR: &str = "CAR_SIGN_IN_PIN_LENGTH";
const API_LEVEL_VAR: &str = "CAR_APP_API_LEVEL";

/// Sign-in flow configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInConfig {
    /// URL shown as a QR code.
    pub sign_in_url: Url,

    /// Length of generated PIN codes.
    ///
    /// Default: 12 (the most the host accepts)
    pub pin_length: usize,

    /// API level reported by the host.
    ///
    /// Default: 8
    pub api_level: u32,
}

impl SignInConfig {
    /// Create a configuration for the given sign-in URL.
    #[must_use]
    pub const fn new(sign_in_url: Url) -> Self {
        Self {
            sign_in_url,
            pin_length: MAX_PIN_LENGTH,
            api_level: DEFAULT_API_LEVEL,
        }
    }

    /// Set the PIN length.
    #[must_use]
    pub const fn with_pin_length(mut self, pin_length: usize) -> Self {
        self.pin_length = pin_length;
        self
    }

    /// Set the host API level.
    #[must_use]
    pub const fn with_api_level(mut self, api_level: u32) -> Self {
        self.api_level = api_level;
        self
    }

    /// Set the sign-in URL.
    #[must_use]
    pub fn with_sign_in_url(mut self, sign_in_url: Url) -> Self {
        self.sign_in_url = sign_in_url;
        self
    }

    /// Whether the host can show the sign-in template at all.
    #[must_use]
    pub const fn supports_sign_in(&self) -> bool {
        self.api_level >= MIN_SIGN_IN_API_LEVEL
    }

    /// Whether the QR code method is offered on input screens.
    #[must_use]
    pub const fn offers_qr_code(&self) -> bool {
        self.api_level > QR_CODE_API_LEVEL_THRESHOLD
    }

    /// Check the invariants `from_env` enforces.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::PinLength`] if `pin_length` is outside `1..=12`
    /// - [`ConfigError::UnsupportedScheme`] if the URL is not http(s)
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_PIN_LENGTH).contains(&self.pin_length) {
            return Err(ConfigError::PinLength {
                length: self.pin_length,
                max: MAX_PIN_LENGTH,
            });
        }

        match self.sign_in_url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ConfigError::UnsupportedScheme {
                scheme: other.to_string(),
            }),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `CAR_SIGN_IN_URL` (default `https://www.example.com/sign-in`)
    /// - `CAR_SIGN_IN_PIN_LENGTH` (default 12)
    /// - `CAR_APP_API_LEVEL` (default 8)
    ///
    /// Unset variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is set but invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a value is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let sign_in_url = match lookup(SIGN_IN_URL_VAR) {
            Some(raw) => Url::parse(raw.trim()).map_err(|error| ConfigError::InvalidUrl {
                reason: error.to_string(),
                value: raw,
            })?,
            None => default_sign_in_url(),
        };

        let config = Self {
            sign_in_url,
            pin_length: parse_or(&lookup, PIN_LENGTH_VAR, MAX_PIN_LENGTH)?,
            api_level: parse_or(&lookup, API_LEVEL_VAR, DEFAULT_API_LEVEL)?,
        };
        config.validate()?;

        tracing::debug!(
            sign_in_url = %config.sign_in_url,
            pin_length = config.pin_length,
            api_level = config.api_level,
            "Loaded sign-in configuration"
        );
        Ok(config)
    }
}

impl Default for SignInConfig {
    fn default() -> Self {
        Self::new(default_sign_in_url())
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T> {
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value: raw }),
        None => Ok(default),
    }
}

#[allow(clippy::expect_used)]
fn default_sign_in_url() -> Url {
    Url::parse(DEFAULT_SIGN_IN_URL).expect("hardcoded sign-in URL should always parse")
}
