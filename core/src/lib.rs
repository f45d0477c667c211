//! # Car Templates Core
//!
//! Core traits and types for screens rendered by a vehicle head-unit host.
//!
//! The host owns the visual surface and the back stack. A screen only
//! describes what it wants: it keeps owned state, reduces user interactions
//! into new state, and returns effect descriptions that the host bridge
//! (the runtime `Store`, or a synchronous facade) carries out.
//!
//! ## Core Concepts
//!
//! - **State**: Owned data for one screen
//! - **Action**: Every input to a screen (clicks, submitted text, async results)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (re-render, navigate, message, async work)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```
//! use car_templates_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct ToggleState {
//!     enabled: bool,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum ToggleAction {
//!     Toggle,
//! }
//!
//! struct ToggleReducer;
//!
//! impl Reducer for ToggleReducer {
//!     type State = ToggleState;
//!     type Action = ToggleAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut ToggleState,
//!         action: ToggleAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<ToggleAction>; 4]> {
//!         match action {
//!             ToggleAction::Toggle => {
//!                 state.enabled = !state.enabled;
//!                 smallvec![Effect::Render]
//!             },
//!         }
//!     }
//! }
//!
//! let mut state = ToggleState::default();
//! let effects = ToggleReducer.reduce(&mut state, ToggleAction::Toggle, &());
//! assert!(state.enabled);
//! assert_eq!(effects.len(), 1);
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Screen routes, navigation commands and the host back-stack contract
pub mod navigation;

/// Host capability invoked for render, navigation and message effects
pub mod host;

mod effect_macros;

/// Reducer module - The core trait for screen logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all screen logic and are deterministic and testable without
/// a host.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for screen logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The screen state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Effects are executed in the order they are returned.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by whatever hosts the
/// reducer. They are values, not execution.
pub mod effect {
    use crate::navigation::Navigation;
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Ask the host to rebuild the current screen's template
        ///
        /// Fire-and-forget: the reducer does not wait for the host to render.
        Render,

        /// Apply a command to the host's screen stack
        Navigate(Navigation),

        /// Show a short, transient message (toast) on the host
        ShowMessage(String),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Render => write!(f, "Effect::Render"),
                Effect::Navigate(navigation) => {
                    f.debug_tuple("Effect::Navigate").field(navigation).finish()
                },
                Effect::ShowMessage(message) => {
                    f.debug_tuple("Effect::ShowMessage").field(message).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Shorthand for a transient host message
        #[must_use]
        pub fn message(text: impl Into<String>) -> Self {
            Self::ShowMessage(text.into())
        }

        /// Returns `true` for effects that only talk to the host
        /// (render, navigation, messages)
        #[must_use]
        pub const fn is_host_effect(&self) -> bool {
            matches!(self, Self::Render | Self::Navigate(_) | Self::ShowMessage(_))
        }
    }
}
