//! Sign-in actions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Buttons and links on the sign-in screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignInAction {
    /// Switch to the PIN method.
    UsePin,
    /// Switch to the QR code method.
    UseQrCode,
    /// Switch back to email and password.
    UseEmail,
    /// Leave without signing in.
    Skip,
    /// Leave the success screen for the home screen.
    GoHome,
    /// Open the terms of service.
    OpenTerms,
    /// Open the privacy policy.
    OpenPrivacyPolicy,
}

impl SignInAction {
    /// Button or link label.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::UsePin => "Use PIN",
            Self::UseQrCode => "Use QR code",
            Self::UseEmail => "Use email",
            Self::Skip => "Skip",
            Self::GoHome => "Go to home",
            Self::OpenTerms => "Terms of Service",
            Self::OpenPrivacyPolicy => "Privacy Policy",
        }
    }
}

/// Everything the sign-in reducer handles.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowAction {
    /// Text submitted from the input field.
    SubmitInput {
        /// Submitted text
        text: String,
    },
    /// A button or link was pressed.
    Pressed(SignInAction),
}

impl FlowAction {
    /// Text submission.
    #[must_use]
    pub fn submit(text: impl Into<String>) -> Self {
        Self::SubmitInput { text: text.into() }
    }
}

impl From<SignInAction> for FlowAction {
    fn from(action: SignInAction) -> Self {
        Self::Pressed(action)
    }
}

// Submitted text may be a password.
impl fmt::Debug for FlowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubmitInput { text } => f
                .debug_struct("SubmitInput")
                .field("len", &text.chars().count())
                .finish_non_exhaustive(),
            Self::Pressed(action) => f.debug_tuple("Pressed").field(action).finish(),
        }
    }
}
