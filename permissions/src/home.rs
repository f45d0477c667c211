//! Home screen: template catalog plus a one-time location pre-flight.

use crate::environment::PermissionEnvironment;
use crate::gate::{DeviceKind, PermissionGate, PermissionOutcome, has_location_permission, missing_permissions};
use crate::messages;
use car_templates_core::async_effect;
use car_templates_core::effect::Effect;
use car_templates_core::navigation::{Navigation, Screen, TemplateKind};
use car_templates_core::reducer::Reducer;
use car_templates_core::{SmallVec, smallvec};
use serde::{Deserialize, Serialize};

type Effects = SmallVec<[Effect<HomeAction>; 4]>;

/// Label of the exit button in the action strip.
pub const EXIT_TITLE: &str = "Exit";

/// Home screen state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeState {
    /// A request was already made while this screen was alive.
    pub requested_permission: bool,
    /// Fine or coarse location is granted.
    pub has_location_permission: bool,
    /// The pre-flight request is waiting for the host.
    pub request_in_flight: bool,
}

/// Home screen actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HomeAction {
    /// Screen became visible.
    Appear,
    /// The host answered the pre-flight request.
    PermissionsResult(PermissionOutcome),
    /// A catalog row was selected.
    Open(TemplateKind),
    /// Exit button.
    Exit,
}

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeRow {
    /// Template opened by the row
    pub kind: TemplateKind,
    /// Row title
    pub title: String,
}

/// What the host renders for the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeView {
    /// Screen title
    pub title: String,
    /// Catalog rows, in display order
    pub rows: Vec<HomeRow>,
    /// Exit button label
    pub exit: String,
}

impl HomeView {
    /// The catalog view.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: messages::HOME_TITLE.to_string(),
            rows: TemplateKind::HOME_CATALOG
                .iter()
                .map(|&kind| HomeRow {
                    kind,
                    title: kind.title().to_string(),
                })
                .collect(),
            exit: EXIT_TITLE.to_string(),
        }
    }
}

impl Default for HomeView {
    fn default() -> Self {
        Self::new()
    }
}

/// Home screen reducer.
#[derive(Debug, Clone)]
pub struct HomePermissionReducer<P> {
    _phantom: std::marker::PhantomData<P>,
}

impl<P> HomePermissionReducer<P> {
    /// Create a new home reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<P> Default for HomePermissionReducer<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> HomePermissionReducer<P>
where
    P: PermissionGate + Clone + 'static,
{
    fn preflight(state: &mut HomeState, env: &PermissionEnvironment<P>) -> Effects {
        state.has_location_permission = has_location_permission(&env.gate);
        if state.has_location_permission || state.requested_permission {
            return SmallVec::new();
        }
        state.requested_permission = true;

        let missing = match missing_permissions(&env.gate) {
            Ok(missing) => missing,
            Err(error) => {
                tracing::warn!(%error, "Pre-flight cannot read declared permissions");
                return smallvec![Effect::message(messages::PACKAGE_NOT_FOUND)];
            },
        };
        if missing.is_empty() {
            return SmallVec::new();
        }

        tracing::debug!(count = missing.len(), "Pre-flight permission request");
        state.request_in_flight = true;
        let gate = env.gate.clone();
        let mut effects: Effects = smallvec![async_effect! {
            let outcome = gate.request_permissions(missing).await;
            Some(HomeAction::PermissionsResult(outcome))
        }];
        if env.gate.device_kind() == DeviceKind::Handheld {
            effects.push(Effect::message(messages::PHONE_SCREEN_GUIDANCE));
        }
        effects
    }
}

impl<P> Reducer for HomePermissionReducer<P>
where
    P: PermissionGate + Clone + 'static,
{
    type State = HomeState;
    type Action = HomeAction;
    type Environment = PermissionEnvironment<P>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            HomeAction::Appear => Self::preflight(state, env),
            HomeAction::PermissionsResult(_) if !state.request_in_flight => {
                tracing::warn!("Pre-flight result without a request");
                SmallVec::new()
            },
            HomeAction::PermissionsResult(outcome) => {
                state.request_in_flight = false;
                state.has_location_permission = has_location_permission(&env.gate);
                if !outcome.approved.is_empty() {
                    tracing::info!(approved = outcome.approved.len(), "Pre-flight approved");
                    smallvec![Effect::message(messages::APPROVED)]
                } else if !outcome.rejected.is_empty() {
                    tracing::warn!(rejected = outcome.rejected.len(), "Pre-flight rejected");
                    smallvec![Effect::message(messages::REJECTED)]
                } else {
                    SmallVec::new()
                }
            },
            HomeAction::Open(kind) => {
                tracing::debug!(template = kind.title(), "Opening template");
                smallvec![Effect::Navigate(Navigation::Push(Screen::Template(kind)))]
            },
            HomeAction::Exit => smallvec![Effect::Navigate(Navigation::Finish)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::PermissionName;
    use crate::mocks::MockPermissionGate;
    use car_templates_testing::{ReducerTest, assertions};

    fn declared() -> MockPermissionGate {
        MockPermissionGate::new().with_declared([
            PermissionName::ACCESS_FINE_LOCATION,
            PermissionName::ACCESS_COARSE_LOCATION,
        ])
    }

    #[test]
    fn test_appear_requests_once() {
        let gate = declared().handheld();
        ReducerTest::new(HomePermissionReducer::new())
            .with_env(PermissionEnvironment::new(gate))
            .given_state(HomeState::default())
            .when_action(HomeAction::Appear)
            .then_state(|s| {
                assert!(s.requested_permission);
                assert!(s.request_in_flight);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 2);
                assertions::assert_has_future_effect(effects);
                assertions::assert_shows_message(effects, messages::PHONE_SCREEN_GUIDANCE);
            })
            .run();

        ReducerTest::new(HomePermissionReducer::new())
            .with_env(PermissionEnvironment::new(declared()))
            .given_state(HomeState {
                requested_permission: true,
                ..HomeState::default()
            })
            .when_action(HomeAction::Appear)
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_appear_with_location_does_nothing() {
        let gate = declared().with_granted([PermissionName::ACCESS_COARSE_LOCATION]);
        ReducerTest::new(HomePermissionReducer::new())
            .with_env(PermissionEnvironment::new(gate))
            .given_state(HomeState::default())
            .when_action(HomeAction::Appear)
            .then_state(|s| {
                assert!(s.has_location_permission);
                assert!(!s.requested_permission);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_appear_package_not_found() {
        ReducerTest::new(HomePermissionReducer::new())
            .with_env(PermissionEnvironment::new(declared().without_package()))
            .given_state(HomeState::default())
            .when_action(HomeAction::Appear)
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_shows_message(effects, messages::PACKAGE_NOT_FOUND);
            })
            .run();
    }

    #[test]
    fn test_result_messages() {
        let location = std::collections::BTreeSet::from([PermissionName::fine_location()]);
        ReducerTest::new(HomePermissionReducer::new())
            .with_env(PermissionEnvironment::new(declared()))
            .given_state(HomeState::default())
            .when_action(HomeAction::Appear)
            .when_action(HomeAction::PermissionsResult(PermissionOutcome::reject_all(location)))
            .then_state(|s| {
                assert!(!s.has_location_permission);
                assert!(!s.request_in_flight);
            })
            .then_effects(|effects| assertions::assert_shows_message(effects, messages::REJECTED))
            .run();
    }

    #[test]
    fn test_result_without_request_is_ignored() {
        let location = std::collections::BTreeSet::from([PermissionName::fine_location()]);
        ReducerTest::new(HomePermissionReducer::new())
            .with_env(PermissionEnvironment::new(declared()))
            .given_state(HomeState::default())
            .when_action(HomeAction::PermissionsResult(PermissionOutcome::approve_all(location)))
            .then_state(|s| assert_eq!(*s, HomeState::default()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_open_and_exit() {
        ReducerTest::new(HomePermissionReducer::new())
            .with_env(PermissionEnvironment::new(declared()))
            .given_state(HomeState::default())
            .when_action(HomeAction::Open(TemplateKind::SignIn))
            .then_effects(|effects| {
                assertions::assert_navigates(
                    effects,
                    &Navigation::Push(Screen::Template(TemplateKind::SignIn)),
                );
            })
            .run();

        ReducerTest::new(HomePermissionReducer::new())
            .with_env(PermissionEnvironment::new(declared()))
            .given_state(HomeState::default())
            .when_action(HomeAction::Exit)
            .then_effects(|effects| assertions::assert_navigates(effects, &Navigation::Finish))
            .run();
    }

    #[test]
    fn test_home_view_lists_catalog() {
        let view = HomeView::new();
        assert_eq!(view.title, "Templates");
        assert_eq!(view.rows.len(), TemplateKind::HOME_CATALOG.len());
        assert!(view.rows.iter().any(|row| row.title == "Sign-In Template"));
    }
}
