//! Permission screens running in a `Store`, with the host request fed back.

#![allow(clippy::unwrap_used)]

use car_templates_core::host::HostEvent;
use car_templates_core::navigation::{Navigation, Screen, ScreenStack, TemplateKind};
use car_templates_permissions::messages;
use car_templates_permissions::mocks::{MockDecision, MockPermissionGate};
use car_templates_permissions::{
    HomeAction, HomePermissionReducer, HomeState, PermissionEnvironment, PermissionGate, PermissionName,
    PermissionScreenConfig, PermissionScreenState, RequestPermissionAction,
    RequestPermissionReducer, RequestPermissionState, RequestPermissionView,
};
use car_templates_runtime::Store;
use car_templates_testing::mocks::{HostRecorder, InMemoryScreenStack};
use std::collections::BTreeSet;
use std::time::Duration;

type RequestStore = Store<
    PermissionScreenState,
    RequestPermissionAction,
    PermissionEnvironment<MockPermissionGate>,
    RequestPermissionReducer<MockPermissionGate>,
>;

const TIMEOUT: Duration = Duration::from_secs(5);

fn location_gate() -> MockPermissionGate {
    MockPermissionGate::new().with_declared([
        PermissionName::ACCESS_FINE_LOCATION,
        PermissionName::ACCESS_COARSE_LOCATION,
        "androidx.car.app.NAVIGATION_TEMPLATES",
    ])
}

fn request_store(gate: MockPermissionGate, config: PermissionScreenConfig) -> RequestStore {
    Store::new(
        PermissionScreenState::new(config),
        RequestPermissionReducer::new(),
        PermissionEnvironment::new(gate),
    )
}

#[tokio::test]
async fn approval_replaces_screen_with_origin() {
    let gate = location_gate();
    let config = PermissionScreenConfig::new().with_origin(TemplateKind::Map);
    let store = request_store(gate.clone(), config);
    let mut recorder = HostRecorder::new(store.subscribe_host_events());
    let mut stack = InMemoryScreenStack::with_screens([config.screen()]);

    store.send(RequestPermissionAction::Check).await.unwrap();
    let view = store.state(RequestPermissionView::new).await;
    assert_eq!(view.missing.len(), 2);

    let mut results = store.subscribe_actions();
    let mut handle = store.send(RequestPermissionAction::Grant).await.unwrap();
    handle.wait_with_timeout(TIMEOUT).await.unwrap();

    let result = results.try_recv().unwrap();
    assert!(matches!(
        result,
        RequestPermissionAction::PermissionsResult(ref outcome) if outcome.approved.len() == 2
    ));

    recorder.apply_navigation(&mut stack);

    assert_eq!(
        stack.screens(),
        &[Screen::Home, Screen::Template(TemplateKind::Map)]
    );
    assert!(
        recorder
            .events()
            .contains(&HostEvent::Message(messages::APPROVED.to_string()))
    );
    assert_eq!(gate.requests().len(), 1);
    assert!(gate.is_granted(&PermissionName::fine_location()));
}

#[tokio::test]
async fn rejection_returns_home() {
    let gate = location_gate().deciding(MockDecision::RejectAll).handheld();
    let store = request_store(gate, PermissionScreenConfig::new().with_pre_seed(true));
    let mut recorder = HostRecorder::new(store.subscribe_host_events());

    store.send(RequestPermissionAction::Check).await.unwrap();
    let mut handle = store.send(RequestPermissionAction::Grant).await.unwrap();
    handle.wait_with_timeout(TIMEOUT).await.unwrap();

    recorder.drain();
    assert_eq!(
        recorder.events(),
        &[
            HostEvent::Render,
            HostEvent::Render,
            HostEvent::Message(messages::PHONE_SCREEN_GUIDANCE.to_string()),
            HostEvent::Message(messages::REJECTED.to_string()),
            HostEvent::Navigate(Navigation::Push(Screen::Home)),
        ]
    );
}

#[tokio::test]
async fn dismissed_dialog_can_be_asked_again() {
    let gate = location_gate().deciding(MockDecision::Dismiss);
    let store = request_store(gate.clone(), PermissionScreenConfig::new());

    store.send(RequestPermissionAction::Check).await.unwrap();
    let mut handle = store.send(RequestPermissionAction::Grant).await.unwrap();
    handle.wait_with_timeout(TIMEOUT).await.unwrap();

    let phase = store.state(|s| s.phase.clone()).await;
    assert!(matches!(phase, RequestPermissionState::NeedsGrant { .. }));

    let mut handle = store.send(RequestPermissionAction::Grant).await.unwrap();
    handle.wait_with_timeout(TIMEOUT).await.unwrap();
    assert_eq!(gate.requests().len(), 2);
}

#[tokio::test]
async fn home_preflight_requests_location_once() {
    let gate = location_gate();
    let store = Store::new(
        HomeState::default(),
        HomePermissionReducer::new(),
        PermissionEnvironment::new(gate.clone()),
    );
    let mut recorder = HostRecorder::new(store.subscribe_host_events());

    let mut handle = store.send(HomeAction::Appear).await.unwrap();
    handle.wait_with_timeout(TIMEOUT).await.unwrap();
    let mut handle = store.send(HomeAction::Appear).await.unwrap();
    handle.wait_with_timeout(TIMEOUT).await.unwrap();

    recorder.drain();
    assert_eq!(
        recorder.events(),
        &[HostEvent::Message(messages::APPROVED.to_string())]
    );
    assert_eq!(
        gate.requests(),
        vec![BTreeSet::from([
            PermissionName::fine_location(),
            PermissionName::coarse_location(),
        ])]
    );
    assert!(store.state(|s| s.has_location_permission).await);
}
