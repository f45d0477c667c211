//! What the host renders for the current sign-in step.
//!
//! A [`SignInViewState`] is a pure function of the flow state and the
//! configuration, so asking for it twice gives the same answer. Once the
//! flow has ended the view offers nothing to press.

use crate::actions::SignInAction;
use crate::config::SignInConfig;
use crate::credentials::Credential;
use crate::error::ValidationError;
use crate::state::{SignInFlowResult, SignInFlowState, SignInState, SignInStep};
use car_templates_core::navigation::HeaderAction;
use serde::{Deserialize, Serialize};
use url::Url;

/// Title of the input, PIN and success screens.
pub const SIGN_IN_TITLE: &str = "Sign in";

/// Title of the QR code screen.
pub const QR_CODE_TITLE: &str = "Scan QR code to sign in";

/// Title shown when the host is too old for the sign-in template.
pub const UNSUPPORTED_TITLE: &str = "Cancel";

/// Body of the success screen.
pub const LOGIN_SUCCESSFUL: &str = "Login successful";

const INPUT_INSTRUCTIONS: &str = "Sign in to sync your saved places and preferences";
const PIN_INSTRUCTIONS: &str = "Go to the sign-in page on your phone and enter this code";
const QR_INSTRUCTIONS: &str = "Scan the code with your phone to sign in";
const UNSUPPORTED_MESSAGE: &str = "Sign in is not available on this vehicle";
const ADDITIONAL_TEXT: &str =
    "By signing in you agree to the Terms of Service and acknowledge the Privacy Policy";

/// Placeholder of the input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputHint {
    /// "Email"
    Email,
    /// "Password"
    Password,
}

/// Keyboard the host should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyboardKind {
    /// Keyboard with `@` and `.com`
    Email,
    /// Plain keyboard
    Default,
}

/// Text input shown on the email and password steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputField {
    /// Placeholder
    pub hint: InputHint,
    /// Keyboard
    pub keyboard: KeyboardKind,
}

/// Clickable span inside the additional text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLink {
    /// Linked words, as they appear in the text
    pub label: String,
    /// Action fired on click
    pub action: SignInAction,
}

/// Everything needed to draw one sign-in screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInViewState {
    /// Current step
    pub state: SignInStep,
    /// `false` when the host API level is too old for sign-in
    pub supported: bool,
    /// How the flow ended, once it has
    pub result: Option<SignInFlowResult>,
    /// Header title
    pub title: String,
    /// Header action
    pub header: HeaderAction,
    /// Last validation error
    pub error: Option<ValidationError>,
    /// Message for `error`
    pub error_message: Option<String>,
    /// Input field, on email and password steps
    pub input: Option<InputField>,
    /// Code to display, on the PIN step only
    pub credential: Option<Credential>,
    /// URL to encode, on the QR code step only
    pub qr_url: Option<Url>,
    /// Text above the sign-in method
    pub instructions: Option<String>,
    /// Body text of message screens
    pub message: Option<String>,
    /// Buttons below the sign-in method
    pub actions: Vec<SignInAction>,
    /// Highlighted button, if any
    pub primary_action: Option<SignInAction>,
    /// Action strip (top right)
    pub strip_actions: Vec<SignInAction>,
    /// Disclaimer below the buttons
    pub additional_text: Option<String>,
    /// Clickable spans in `additional_text`
    pub links: Vec<TextLink>,
}

impl SignInViewState {
    /// Describe the screen for `flow` under `config`.
    #[must_use]
    pub fn new(flow: &SignInFlowState, config: &SignInConfig) -> Self {
        if let Some(result) = flow.result {
            return Self::finished(flow, result, config);
        }
        if !config.supports_sign_in() {
            return Self::unsupported(flow);
        }

        let mut view = Self::blank(flow);
        match &flow.state {
            SignInState::Email | SignInState::Password => {
                let (hint, keyboard) = if flow.state == SignInState::Email {
                    (InputHint::Email, KeyboardKind::Email)
                } else {
                    (InputHint::Password, KeyboardKind::Default)
                };
                view.input = Some(InputField { hint, keyboard });
                view.instructions = Some(INPUT_INSTRUCTIONS.to_string());
                view.actions = vec![alternate_method(config)];
                view.with_sign_in_chrome()
            },
            SignInState::Pin { credential } => {
                view.credential = Some(credential.clone());
                view.instructions = Some(PIN_INSTRUCTIONS.to_string());
                view.actions = vec![SignInAction::UseEmail];
                view.with_sign_in_chrome()
            },
            SignInState::QrCode { url } => {
                view.title = QR_CODE_TITLE.to_string();
                view.qr_url = Some(url.clone());
                view.instructions = Some(QR_INSTRUCTIONS.to_string());
                view.actions = vec![SignInAction::UseEmail, SignInAction::UsePin];
                view.with_sign_in_chrome()
            },
            SignInState::Success => {
                view.message = Some(LOGIN_SUCCESSFUL.to_string());
                view.actions = vec![SignInAction::GoHome];
                view.primary_action = Some(SignInAction::GoHome);
                view
            },
        }
    }

    fn blank(flow: &SignInFlowState) -> Self {
        Self {
            state: flow.state.step(),
            supported: true,
            result: None,
            title: SIGN_IN_TITLE.to_string(),
            header: HeaderAction::Back,
            error: flow.error,
            error_message: flow.error.map(ValidationError::user_message),
            input: None,
            credential: None,
            qr_url: None,
            instructions: None,
            message: None,
            actions: Vec::new(),
            primary_action: None,
            strip_actions: Vec::new(),
            additional_text: None,
            links: Vec::new(),
        }
    }

    fn unsupported(flow: &SignInFlowState) -> Self {
        Self {
            supported: false,
            title: UNSUPPORTED_TITLE.to_string(),
            error: None,
            error_message: None,
            message: Some(UNSUPPORTED_MESSAGE.to_string()),
            ..Self::blank(flow)
        }
    }

    /// Closing screen: no input, credential or chrome.
    fn finished(flow: &SignInFlowState, result: SignInFlowResult, config: &SignInConfig) -> Self {
        let message = match result {
            SignInFlowResult::Success => Some(LOGIN_SUCCESSFUL.to_string()),
            SignInFlowResult::Abandoned => None,
        };
        Self {
            supported: config.supports_sign_in(),
            result: Some(result),
            error: None,
            error_message: None,
            message,
            ..Self::blank(flow)
        }
    }

    /// Skip strip and terms/privacy links shared by every non-success step.
    fn with_sign_in_chrome(mut self) -> Self {
        self.strip_actions = vec![SignInAction::Skip];
        self.additional_text = Some(ADDITIONAL_TEXT.to_string());
        self.links = [SignInAction::OpenTerms, SignInAction::OpenPrivacyPolicy]
            .into_iter()
            .map(|action| TextLink {
                label: action.title().to_string(),
                action,
            })
            .collect();
        self
    }

    /// Whether `action` is drawn anywhere on this screen.
    #[must_use]
    pub fn offers(&self, action: SignInAction) -> bool {
        self.actions.contains(&action)
            || self.strip_actions.contains(&action)
            || self.links.iter().any(|link| link.action == action)
    }
}

/// The single alternate method offered next to the input field.
const fn alternate_method(config: &SignInConfig) -> SignInAction {
    if config.offers_qr_code() {
        SignInAction::UseQrCode
    } else {
        SignInAction::UsePin
    }
}
