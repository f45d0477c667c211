//! Synchronous sign-in facade for hosts that call in directly.
//!
//! [`SignInFlow`] owns one flow's state and runs the reducer inline,
//! delivering render and navigation requests to a [`ScreenHost`] before each
//! call returns. Hosts that prefer an async event stream run
//! [`SignInReducer`] in a `Store` instead.

use crate::actions::{FlowAction, SignInAction};
use crate::credentials::CodeGenerator;
use crate::environment::SignInEnvironment;
use crate::error::ValidationError;
use crate::reducer::SignInReducer;
use crate::state::{SignInFlowResult, SignInFlowState, SignInState};
use crate::view::SignInViewState;
use car_templates_core::effect::Effect;
use car_templates_core::host::{HostEvent, ScreenHost};
use car_templates_core::reducer::Reducer;

/// One sign-in flow bound to a host.
pub struct SignInFlow<G, H>
where
    G: CodeGenerator,
    H: ScreenHost,
{
    reducer: SignInReducer<G>,
    environment: SignInEnvironment<G>,
    state: SignInFlowState,
    host: H,
}

impl<G, H> SignInFlow<G, H>
where
    G: CodeGenerator,
    H: ScreenHost,
{
    /// Start a flow at the email step.
    #[must_use]
    pub fn new(environment: SignInEnvironment<G>, host: H) -> Self {
        Self {
            reducer: SignInReducer::new(),
            environment,
            state: SignInFlowState::new(),
            host,
        }
    }

    /// Text submitted on the email or password step.
    ///
    /// Ignored on other steps.
    pub fn on_submit_input(&mut self, text: &str) {
        self.dispatch(FlowAction::submit(text));
    }

    /// A button or link was pressed.
    pub fn on_action(&mut self, action: SignInAction) {
        self.dispatch(FlowAction::Pressed(action));
    }

    /// Describe the current screen. Calling it does not change anything.
    #[must_use]
    pub fn current_view_state(&self) -> SignInViewState {
        SignInViewState::new(&self.state, &self.environment.config)
    }

    /// How the flow ended, once it has.
    #[must_use]
    pub const fn result(&self) -> Option<SignInFlowResult> {
        self.state.result
    }

    /// Current step.
    #[must_use]
    pub const fn state(&self) -> &SignInState {
        &self.state.state
    }

    /// Last validation error.
    #[must_use]
    pub const fn error(&self) -> Option<ValidationError> {
        self.state.error
    }

    /// The host this flow renders to.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    fn dispatch(&mut self, action: FlowAction) {
        let effects = self
            .reducer
            .reduce(&mut self.state, action, &self.environment);

        for effect in effects {
            match HostEvent::try_from_effect(effect) {
                Ok(event) => self.host.deliver(event),
                Err(Effect::None) => {},
                Err(other) => tracing::warn!(effect = ?other, "Sign-in flow cannot run async effects"),
            }
        }
    }
}

impl<G, H> std::fmt::Debug for SignInFlow<G, H>
where
    G: CodeGenerator,
    H: ScreenHost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInFlow")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
