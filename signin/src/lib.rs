//! # Car Templates Sign-In
//!
//! The multi-step sign-in flow of a head-unit app, as a reducer.
//!
//! ## Steps
//!
//! - **Email / Password**: text input, validated on submit
//! - **PIN**: a fresh one-time code to enter on another device
//! - **QR code**: the sign-in page URL to scan with a phone
//! - **Success**: "Login successful", then back to the home screen
//!
//! Invalid input never fails: it becomes a [`ValidationError`] attached to
//! the current step and the host is asked to re-render.
//!
//! ## Example
//!
//! ```rust
//! use car_templates_signin::{SignInAction, SignInEnvironment, SignInFlow, SignInState};
//! use car_templates_core::host::ScreenHost;
//! use car_templates_core::navigation::Navigation;
//!
//! struct Headless;
//!
//! impl ScreenHost for Headless {
//!     fn invalidate(&self) {}
//!     fn navigate(&self, _navigation: Navigation) {}
//!     fn show_message(&self, _message: &str) {}
//! }
//!
//! let mut flow = SignInFlow::new(SignInEnvironment::default(), Headless);
//! flow.on_submit_input("user@example.com");
//! flow.on_submit_input("StrongP1!");
//! assert_eq!(flow.state(), &SignInState::Success);
//!
//! flow.on_action(SignInAction::GoHome);
//! assert!(flow.result().is_some());
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod actions;
pub mod config;
pub mod credentials;
pub mod environment;
pub mod error;
pub mod flow;
pub mod reducer;
pub mod state;
pub mod validation;
pub mod view;

/// Deterministic code generators for testing.
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use actions::{FlowAction, SignInAction};
pub use config::SignInConfig;
pub use credentials::{CodeGenerator, Credential, RandomCodeGenerator};
pub use environment::SignInEnvironment;
pub use error::{ConfigError, CredentialError, ValidationError};
pub use flow::SignInFlow;
pub use reducer::SignInReducer;
pub use state::{SignInFlowResult, SignInFlowState, SignInState, SignInStep};
pub use view::SignInViewState;
