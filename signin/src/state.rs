//! Sign-in state types.

use crate::credentials::Credential;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// The active sign-in step.
///
/// Per-step data lives in the variant: a credential exists only in `Pin`,
/// a URL only in `QrCode`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum SignInState {
    /// Waiting for an email address.
    #[default]
    Email,
    /// Waiting for a password.
    Password,
    /// Showing a one-time code to enter elsewhere.
    Pin {
        /// Code generated on entry.
        credential: Credential,
    },
    /// Showing a QR code that opens the sign-in page.
    QrCode {
        /// URL encoded in the QR code.
        url: Url,
    },
    /// Signed in.
    Success,
}

impl SignInState {
    /// The step without its data.
    #[must_use]
    pub const fn step(&self) -> SignInStep {
        match self {
            Self::Email => SignInStep::Email,
            Self::Password => SignInStep::Password,
            Self::Pin { .. } => SignInStep::Pin,
            Self::QrCode { .. } => SignInStep::QrCode,
            Self::Success => SignInStep::Success,
        }
    }

    /// `true` for the steps that accept text input.
    #[must_use]
    pub const fn accepts_input(&self) -> bool {
        matches!(self, Self::Email | Self::Password)
    }

    /// `true` once signed in.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Fieldless mirror of [`SignInState`], for logs and view states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignInStep {
    /// Email input
    Email,
    /// Password input
    Password,
    /// PIN display
    Pin,
    /// QR code display
    QrCode,
    /// Signed in
    Success,
}

impl SignInStep {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::Pin => "pin",
            Self::QrCode => "qr_code",
            Self::Success => "success",
        }
    }
}

impl fmt::Display for SignInStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a sign-in flow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignInFlowResult {
    /// Signed in and sent to the home screen.
    Success,
    /// Skipped without signing in.
    Abandoned,
}

/// State owned by one sign-in flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInFlowState {
    /// Current step.
    pub state: SignInState,

    /// Last rejected submission, cleared by any step change.
    pub error: Option<ValidationError>,

    /// Set once the flow has ended; every later action is ignored.
    pub result: Option<SignInFlowResult>,
}

impl SignInFlowState {
    /// A flow at the email step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once `result` is set.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.result.is_some()
    }
}
