//! Sign-in reducer.
//!
//! # Transitions
//!
//! ```text
//! Email     submit valid email     -> Password
//! Password  submit valid password  -> Success
//! Email     UsePin / UseQrCode     -> Pin / QrCode
//! Password  UsePin / UseQrCode     -> Pin / QrCode
//! QrCode    UsePin                 -> Pin
//! Pin       UseEmail               -> Email
//! QrCode    UseEmail               -> Email
//! Success   GoHome                 -> finished (Success), push Home
//! ```
//!
//! `Skip` ends the flow from any step except `Success`. Pairs not listed
//! above change nothing and request no render.

use crate::actions::{FlowAction, SignInAction};
use crate::credentials::{CodeGenerator, build_sign_in_url};
use crate::environment::SignInEnvironment;
use crate::state::{SignInFlowResult, SignInFlowState, SignInState, SignInStep};
use crate::validation::{validate_email, validate_password};
use car_templates_core::effect::Effect;
use car_templates_core::navigation::{LongMessageKind, Navigation, Screen};
use car_templates_core::reducer::Reducer;
use car_templates_core::{SmallVec, smallvec};

type Effects = SmallVec<[Effect<FlowAction>; 4]>;

/// Sign-in state machine.
#[derive(Debug, Clone)]
pub struct SignInReducer<G> {
    _phantom: std::marker::PhantomData<G>,
}

impl<G> SignInReducer<G> {
    /// Create a new sign-in reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<G> Default for SignInReducer<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G> SignInReducer<G>
where
    G: CodeGenerator,
{
    /// Validate `text` for the current input step.
    fn submit(state: &mut SignInFlowState, text: &str) -> Effects {
        let (rejection, next) = if state.state == SignInState::Email {
            (validate_email(text), SignInState::Password)
        } else {
            (validate_password(text), SignInState::Success)
        };

        match rejection {
            Some(error) => {
                tracing::warn!(step = %state.state.step(), %error, "Rejected sign-in input");
                state.error = Some(error);
                smallvec![Effect::Render]
            },
            None => Self::transition(state, next),
        }
    }

    fn press(
        state: &mut SignInFlowState,
        action: SignInAction,
        env: &SignInEnvironment<G>,
    ) -> Effects {
        if !env.config.supports_sign_in() && action != SignInAction::Skip {
            tracing::debug!(
                ?action,
                api_level = env.config.api_level,
                "Sign-in unsupported on this host"
            );
            return SmallVec::new();
        }

        let current = state.state.step();
        let open = !state.state.is_terminal();

        match (action, current) {
            (SignInAction::UsePin, SignInStep::Email | SignInStep::Password | SignInStep::QrCode) => {
                let credential = env.codes.generate(env.config.pin_length);
                Self::transition(state, SignInState::Pin { credential })
            },
            (SignInAction::UseQrCode, SignInStep::Email | SignInStep::Password) => {
                let url = build_sign_in_url(&env.config);
                Self::transition(state, SignInState::QrCode { url })
            },
            (SignInAction::UseEmail, SignInStep::Pin | SignInStep::QrCode) => {
                Self::transition(state, SignInState::Email)
            },
            (SignInAction::GoHome, SignInStep::Success) => Self::finish(
                state,
                SignInFlowResult::Success,
                Navigation::Push(Screen::Home),
            ),
            (SignInAction::Skip, _) if open => {
                Self::finish(state, SignInFlowResult::Abandoned, Navigation::Pop)
            },
            (SignInAction::OpenTerms, _) if open => {
                smallvec![Effect::Navigate(Navigation::Push(Screen::LongMessage(
                    LongMessageKind::TermsOfService
                )))]
            },
            (SignInAction::OpenPrivacyPolicy, _) if open => {
                smallvec![Effect::Navigate(Navigation::Push(Screen::LongMessage(
                    LongMessageKind::PrivacyPolicy
                )))]
            },
            (action, step) => {
                tracing::debug!(?action, %step, "Action not available in this step");
                SmallVec::new()
            },
        }
    }

    /// Move to `next`, clearing any error.
    fn transition(state: &mut SignInFlowState, next: SignInState) -> Effects {
        let from = state.state.step();
        state.state = next;
        state.error = None;
        tracing::debug!(%from, to = %state.state.step(), "Sign-in transition");
        smallvec![Effect::Render]
    }

    fn finish(
        state: &mut SignInFlowState,
        result: SignInFlowResult,
        navigation: Navigation,
    ) -> Effects {
        state.result = Some(result);
        state.error = None;
        if matches!(state.state, SignInState::Pin { .. }) {
            // The credential must not outlive the flow.
            state.state = SignInState::Email;
        }
        tracing::info!(?result, "Sign-in flow finished");
        smallvec![Effect::Navigate(navigation)]
    }
}

impl<G> Reducer for SignInReducer<G>
where
    G: CodeGenerator,
{
    type State = SignInFlowState;
    type Action = FlowAction;
    type Environment = SignInEnvironment<G>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if let Some(result) = state.result {
            tracing::debug!(?result, ?action, "Sign-in flow already finished");
            return SmallVec::new();
        }

        match action {
            FlowAction::SubmitInput { text } => {
                if !env.config.supports_sign_in() || !state.state.accepts_input() {
                    tracing::debug!(step = %state.state.step(), "Ignoring input outside an input step");
                    return SmallVec::new();
                }
                Self::submit(state, &text)
            },
            FlowAction::Pressed(action) => Self::press(state, action, env),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SignInConfig;
    use crate::credentials::{CODE_ALPHABET, Credential, RandomCodeGenerator};
    use crate::error::ValidationError;
    use crate::mocks::FixedCodeGenerator;
    use car_templates_testing::{ReducerTest, assertions};

    fn env() -> SignInEnvironment<FixedCodeGenerator> {
        SignInEnvironment::new(SignInConfig::default(), FixedCodeGenerator::default())
    }

    fn at(state: SignInState) -> SignInFlowState {
        SignInFlowState {
            state,
            ..SignInFlowState::default()
        }
    }

    fn pin() -> SignInState {
        SignInState::Pin {
            credential: FixedCodeGenerator::default().generate(12),
        }
    }

    fn qr() -> SignInState {
        SignInState::QrCode {
            url: SignInConfig::default().sign_in_url,
        }
    }

    #[test]
    fn test_invalid_email_sets_error() {
        ReducerTest::new(SignInReducer::new())
            .with_env(env())
            .given_state(SignInFlowState::new())
            .when_action(FlowAction::submit("bad"))
            .then_state(|s| {
                assert_eq!(s.state, SignInState::Email);
                assert_eq!(s.error, Some(ValidationError::TooShort));
            })
            .then_effects(assertions::assert_renders_once)
            .run();
    }

    #[test]
    fn test_email_then_password_reaches_success() {
        ReducerTest::new(SignInReducer::new())
            .with_env(env())
            .given_state(SignInFlowState::new())
            .when_action(FlowAction::submit("bad"))
            .when_action(FlowAction::submit("user@example.com"))
            .then_state(|s| {
                assert_eq!(s.state, SignInState::Password);
                assert_eq!(s.error, None);
            })
            .then_effects(assertions::assert_renders_once)
            .run();

        ReducerTest::new(SignInReducer::new())
            .with_env(env())
            .given_state(at(SignInState::Password))
            .when_action(FlowAction::submit("weak"))
            .when_action(FlowAction::submit("StrongP1!"))
            .then_state(|s| {
                assert_eq!(s.state, SignInState::Success);
                assert_eq!(s.error, None);
                assert_eq!(s.result, None);
            })
            .then_effects(assertions::assert_renders_once)
            .run();
    }

    #[test]
    fn test_invalid_password_keeps_step() {
        ReducerTest::new(SignInReducer::new())
            .with_env(env())
            .given_state(at(SignInState::Password))
            .when_action(FlowAction::submit("abcdefgh"))
            .then_state(|s| {
                assert_eq!(s.state, SignInState::Password);
                assert_eq!(s.error, Some(ValidationError::MissingDigit));
            })
            .then_effects(assertions::assert_renders_once)
            .run();
    }

    #[test]
    fn test_use_pin_clears_pending_error() {
        ReducerTest::new(SignInReducer::new())
            .with_env(SignInEnvironment::with_random_codes(SignInConfig::default()))
            .given_state(SignInFlowState {
                state: SignInState::Password,
                error: Some(ValidationError::MissingDigit),
                result: None,
            })
            .when_action(FlowAction::Pressed(SignInAction::UsePin))
            .then_state(|s| {
                let SignInState::Pin { credential } = &s.state else {
                    unreachable!("expected the PIN step, got {:?}", s.state);
                };
                assert_eq!(credential.len(), 12);
                assert!(credential.as_str().bytes().all(|b| CODE_ALPHABET.contains(&b)));
                assert_eq!(s.error, None);
            })
            .then_effects(assertions::assert_renders_once)
            .run();
    }

    #[test]
    fn test_use_qr_code_uses_configured_url() {
        ReducerTest::new(SignInReducer::new())
            .with_env(env())
            .given_state(SignInFlowState::new())
            .when_action(FlowAction::Pressed(SignInAction::UseQrCode))
            .then_state(|s| assert_eq!(s.state, qr()))
            .then_effects(assertions::assert_renders_once)
            .run();
    }

    #[test]
    fn test_alternate_paths() {
        let cases = [
            (pin(), SignInAction::UseEmail, SignInStep::Email),
            (qr(), SignInAction::UseEmail, SignInStep::Email),
            (qr(), SignInAction::UsePin, SignInStep::Pin),
            (SignInState::Password, SignInAction::UseQrCode, SignInStep::QrCode),
            (SignInState::Email, SignInAction::UsePin, SignInStep::Pin),
        ];

        for (from, action, to) in cases {
            ReducerTest::new(SignInReducer::new())
                .with_env(env())
                .given_state(at(from))
                .when_action(FlowAction::Pressed(action))
                .then_state(move |s| assert_eq!(s.state.step(), to))
                .then_effects(assertions::assert_renders_once)
                .run();
        }
    }

    #[test]
    fn test_pin_is_regenerated_on_every_entry() {
        let reducer = SignInReducer::<RandomCodeGenerator>::new();
        let env = SignInEnvironment::default();
        let mut state = SignInFlowState::new();
        let mut codes = Vec::new();

        for _ in 0..4 {
            let _ = reducer.reduce(&mut state, SignInAction::UsePin.into(), &env);
            if let SignInState::Pin { credential } = &state.state {
                codes.push(credential.clone());
            }
            let _ = reducer.reduce(&mut state, SignInAction::UseEmail.into(), &env);
        }

        codes.dedup();
        assert_eq!(codes.len(), 4);
    }

    #[test]
    fn test_noop_pairs_change_nothing() {
        let cases: Vec<(SignInState, FlowAction)> = vec![
            (pin(), FlowAction::submit("user@example.com")),
            (qr(), FlowAction::submit("StrongP1!")),
            (SignInState::Success, FlowAction::submit("user@example.com")),
            (SignInState::Email, SignInAction::UseEmail.into()),
            (SignInState::Password, SignInAction::UseEmail.into()),
            (pin(), SignInAction::UsePin.into()),
            (pin(), SignInAction::UseQrCode.into()),
            (qr(), SignInAction::UseQrCode.into()),
            (SignInState::Email, SignInAction::GoHome.into()),
            (SignInState::Success, SignInAction::Skip.into()),
            (SignInState::Success, SignInAction::UsePin.into()),
        ];

        for (from, action) in cases {
            let before = SignInFlowState {
                state: from,
                error: None,
                result: None,
            };
            let expected = before.clone();
            ReducerTest::new(SignInReducer::new())
                .with_env(env())
                .given_state(before)
                .when_action(action)
                .then_state(move |s| assert_eq!(*s, expected))
                .then_effects(assertions::assert_no_effects)
                .run();
        }
    }

    #[test]
    fn test_noop_keeps_pending_error() {
        ReducerTest::new(SignInReducer::new())
            .with_env(env())
            .given_state(SignInFlowState {
                state: SignInState::Email,
                error: Some(ValidationError::InvalidFormat),
                result: None,
            })
            .when_action(FlowAction::Pressed(SignInAction::UseEmail))
            .then_state(|s| assert_eq!(s.error, Some(ValidationError::InvalidFormat)))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_skip_abandons_from_every_non_terminal_step() {
        for from in [SignInState::Email, SignInState::Password, pin(), qr()] {
            ReducerTest::new(SignInReducer::new())
                .with_env(env())
                .given_state(at(from))
                .when_action(FlowAction::Pressed(SignInAction::Skip))
                .then_state(|s| {
                    assert_eq!(s.result, Some(SignInFlowResult::Abandoned));
                    assert!(!matches!(s.state, SignInState::Pin { .. }));
                })
                .then_effects(|effects| {
                    assertions::assert_effects_count(effects, 1);
                    assertions::assert_navigates(effects, &Navigation::Pop);
                })
                .run();
        }
    }

    #[test]
    fn test_go_home_from_success() {
        ReducerTest::new(SignInReducer::new())
            .with_env(env())
            .given_state(at(SignInState::Success))
            .when_action(FlowAction::Pressed(SignInAction::GoHome))
            .then_state(|s| {
                assert_eq!(s.result, Some(SignInFlowResult::Success));
                assert_eq!(s.error, None);
            })
            .then_effects(|effects| {
                assertions::assert_no_render(effects);
                assertions::assert_navigates(effects, &Navigation::Push(Screen::Home));
            })
            .run();
    }

    #[test]
    fn test_finished_flow_ignores_actions() {
        ReducerTest::new(SignInReducer::new())
            .with_env(env())
            .given_state(SignInFlowState::new())
            .when_action(FlowAction::Pressed(SignInAction::Skip))
            .when_action(FlowAction::Pressed(SignInAction::UsePin))
            .then_state(|s| {
                assert_eq!(s.state, SignInState::Email);
                assert_eq!(s.result, Some(SignInFlowResult::Abandoned));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_terms_and_privacy_push_long_message_without_render() {
        ReducerTest::new(SignInReducer::new())
            .with_env(env())
            .given_state(at(SignInState::Password))
            .when_action(FlowAction::Pressed(SignInAction::OpenTerms))
            .then_state(|s| assert_eq!(s.state, SignInState::Password))
            .then_effects(|effects| {
                assertions::assert_no_render(effects);
                assertions::assert_navigates(
                    effects,
                    &Navigation::Push(Screen::LongMessage(LongMessageKind::TermsOfService)),
                );
            })
            .run();

        ReducerTest::new(SignInReducer::new())
            .with_env(env())
            .given_state(at(qr()))
            .when_action(FlowAction::Pressed(SignInAction::OpenPrivacyPolicy))
            .then_effects(|effects| {
                assertions::assert_navigates(
                    effects,
                    &Navigation::Push(Screen::LongMessage(LongMessageKind::PrivacyPolicy)),
                );
            })
            .run();
    }

    #[test]
    fn test_unsupported_host_only_allows_skip() {
        let old_host = || {
            SignInEnvironment::new(
                SignInConfig::default().with_api_level(1),
                FixedCodeGenerator::default(),
            )
        };

        ReducerTest::new(SignInReducer::new())
            .with_env(old_host())
            .given_state(SignInFlowState::new())
            .when_action(FlowAction::submit("user@example.com"))
            .when_action(FlowAction::Pressed(SignInAction::UsePin))
            .then_state(|s| assert_eq!(*s, SignInFlowState::new()))
            .then_effects(assertions::assert_no_effects)
            .run();

        ReducerTest::new(SignInReducer::new())
            .with_env(old_host())
            .given_state(SignInFlowState::new())
            .when_action(FlowAction::Pressed(SignInAction::Skip))
            .then_state(|s| assert_eq!(s.result, Some(SignInFlowResult::Abandoned)))
            .then_effects(|effects| assertions::assert_navigates(effects, &Navigation::Pop))
            .run();
    }

    #[test]
    fn test_configured_pin_length() {
        let env = SignInEnvironment::with_random_codes(SignInConfig::default().with_pin_length(6));
        ReducerTest::new(SignInReducer::new())
            .with_env(env)
            .given_state(SignInFlowState::new())
            .when_action(FlowAction::Pressed(SignInAction::UsePin))
            .then_state(|s| {
                let len = match &s.state {
                    SignInState::Pin { credential } => credential.len(),
                    _ => 0,
                };
                assert_eq!(len, 6);
            })
            .run();
    }

    #[test]
    fn test_fixed_generator_credential_is_valid() {
        let credential = FixedCodeGenerator::default().generate(12);
        assert_eq!(Credential::try_from(credential.as_str()), Ok(credential));
    }
}
