//! # Car Templates Permissions
//!
//! Runtime permissions for head-unit apps.
//!
//! The host owns the permission dialogs. Screens talk to it through a
//! [`PermissionGate`], which lists what the app declares and holds and
//! asks the user for more. Two screens are built on it:
//!
//! - the request-permission screen ([`RequestPermissionReducer`]), shown
//!   before screens that need location or vehicle data
//! - the home screen ([`HomePermissionReducer`]), which asks once for
//!   location when it first appears
//!
//! ## Example
//!
//! ```rust
//! use car_templates_core::reducer::Reducer;
//! use car_templates_permissions::mocks::MockPermissionGate;
//! use car_templates_permissions::{
//!     PermissionEnvironment, PermissionName, PermissionScreenConfig, PermissionScreenState,
//!     RequestPermissionAction, RequestPermissionReducer, RequestPermissionState,
//! };
//!
//! let gate = MockPermissionGate::new().with_declared([PermissionName::ACCESS_FINE_LOCATION]);
//! let env = PermissionEnvironment::new(gate);
//! let reducer = RequestPermissionReducer::new();
//! let mut state = PermissionScreenState::new(PermissionScreenConfig::new());
//!
//! reducer.reduce(&mut state, RequestPermissionAction::Check, &env);
//! assert!(matches!(state.phase, RequestPermissionState::NeedsGrant { .. }));
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod environment;
pub mod error;
pub mod gate;
pub mod home;
pub mod messages;
pub mod request;

/// Mock permission gate for testing.
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use environment::PermissionEnvironment;
pub use error::PermissionError;
pub use gate::{
    DeviceKind, PermissionGate, PermissionName, PermissionOutcome, has_location_permission,
    missing_permissions,
};
pub use home::{HomeAction, HomePermissionReducer, HomeState, HomeView};
pub use request::{
    PermissionButton, PermissionScreenConfig, PermissionScreenState, RequestPermissionAction,
    RequestPermissionReducer, RequestPermissionState, RequestPermissionView,
};
