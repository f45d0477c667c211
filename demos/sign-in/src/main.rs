//! Sign-in demo binary
//!
//! Drives the home pre-flight, the request-permission screen and every
//! sign-in path through real stores, with a mock permission gate standing
//! in for the head unit. Host events and view states are printed as JSON.

use car_templates_core::navigation::{Screen, TemplateKind};
use car_templates_permissions::mocks::{MockDecision, MockPermissionGate};
use car_templates_permissions::{
    HomeAction, HomePermissionReducer, HomeState, HomeView, PermissionEnvironment, PermissionName,
    PermissionScreenConfig, PermissionScreenState, RequestPermissionAction,
    RequestPermissionReducer, RequestPermissionView,
};
use car_templates_runtime::Store;
use car_templates_runtime::metrics::register_metrics;
use car_templates_signin::{
    FlowAction, RandomCodeGenerator, SignInAction, SignInConfig, SignInEnvironment,
    SignInFlowState, SignInReducer, SignInViewState,
};
use car_templates_testing::mocks::{HostRecorder, InMemoryScreenStack};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type SignInStore = Store<
    SignInFlowState,
    FlowAction,
    SignInEnvironment<RandomCodeGenerator>,
    SignInReducer<RandomCodeGenerator>,
>;

const EFFECT_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sign_in_demo=debug,car_templates_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    register_metrics();

    let config = SignInConfig::from_env()?;
    tracing::info!(
        url = %config.sign_in_url,
        api_level = config.api_level,
        pin_length = config.pin_length,
        "Loaded sign-in configuration"
    );

    println!("=== Car Templates: sign-in and permissions ===");

    home_preflight().await?;
    request_permission().await?;

    let paths: [(&str, Vec<FlowAction>); 4] = [
        (
            "email and password",
            vec![
                FlowAction::submit("bad"),
                FlowAction::submit("driver@example.com"),
                FlowAction::submit("weakpass"),
                FlowAction::submit("Str0ng!Pass"),
                SignInAction::GoHome.into(),
            ],
        ),
        (
            "PIN, then back to email",
            vec![
                SignInAction::UsePin.into(),
                SignInAction::UseEmail.into(),
                SignInAction::Skip.into(),
            ],
        ),
        (
            "QR code, then PIN",
            vec![SignInAction::UseQrCode.into(), SignInAction::UsePin.into(), SignInAction::Skip.into()],
        ),
        (
            "terms and privacy",
            vec![
                SignInAction::OpenTerms.into(),
                SignInAction::OpenPrivacyPolicy.into(),
            ],
        ),
    ];
    for (name, actions) in paths {
        sign_in_path(name, &config, actions).await?;
    }

    println!("\n=== Unsupported host (API level 1) ===");
    sign_in_path(
        "unsupported",
        &config.clone().with_api_level(1),
        vec![FlowAction::submit("driver@example.com"), SignInAction::Skip.into()],
    )
    .await?;

    println!("\n=== Session complete ===");
    Ok(())
}

/// Home screen asks for location once on first appearance.
async fn home_preflight() -> anyhow::Result<()> {
    println!("\n=== Home pre-flight ===");

    let gate = MockPermissionGate::new().with_declared([
        PermissionName::ACCESS_FINE_LOCATION,
        PermissionName::ACCESS_COARSE_LOCATION,
    ]);
    let store = Store::new(
        HomeState::default(),
        HomePermissionReducer::new(),
        PermissionEnvironment::new(gate),
    );
    let mut recorder = HostRecorder::new(store.subscribe_host_events());
    let mut stack = InMemoryScreenStack::new();

    println!("{}", serde_json::to_string_pretty(&HomeView::new())?);

    for action in [HomeAction::Appear, HomeAction::Appear, HomeAction::Open(TemplateKind::SignIn)] {
        println!("\n>>> {action:?}");
        store.send(action).await?.wait_with_timeout(EFFECT_TIMEOUT).await?;
        report(&mut recorder, &mut stack)?;
    }

    let state = store.state(|s| *s).await;
    println!("home state: {}", serde_json::to_string(&state)?);
    Ok(())
}

/// Request screen opened from the map template on a phone.
async fn request_permission() -> anyhow::Result<()> {
    println!("\n=== Request permission ===");

    for decision in [MockDecision::Dismiss, MockDecision::ApproveAll] {
        let gate = MockPermissionGate::new()
            .with_declared([
                PermissionName::ACCESS_FINE_LOCATION,
                "androidx.car.app.MAP_TEMPLATES",
            ])
            .handheld()
            .location_disabled()
            .deciding(decision);
        let config = PermissionScreenConfig::new().with_origin(TemplateKind::Map);
        let store = Store::new(
            PermissionScreenState::new(config),
            RequestPermissionReducer::new(),
            PermissionEnvironment::new(gate),
        );
        let mut recorder = HostRecorder::new(store.subscribe_host_events());
        let mut stack = InMemoryScreenStack::with_screens([config.screen()]);

        println!("\n--- host decides {decision:?} ---");
        for action in [RequestPermissionAction::Check, RequestPermissionAction::Grant] {
            println!("\n>>> {action:?}");
            store.send(action).await?.wait_with_timeout(EFFECT_TIMEOUT).await?;
            report(&mut recorder, &mut stack)?;
            let view = store.state(RequestPermissionView::new).await;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }
    Ok(())
}

/// Run one scripted sign-in path in a fresh store.
async fn sign_in_path(
    name: &str,
    config: &SignInConfig,
    actions: Vec<FlowAction>,
) -> anyhow::Result<()> {
    println!("\n=== Sign-in path: {name} ===");

    let store: SignInStore = Store::new(
        SignInFlowState::new(),
        SignInReducer::new(),
        SignInEnvironment::with_random_codes(config.clone()),
    );
    let mut recorder = HostRecorder::new(store.subscribe_host_events());
    let mut stack = InMemoryScreenStack::with_screens([Screen::Template(TemplateKind::SignIn)]);

    for action in actions {
        println!("\n>>> {action:?}");
        store.send(action).await?;
        report(&mut recorder, &mut stack)?;
        let view = store.state(|s| SignInViewState::new(s, config)).await;
        println!("{}", serde_json::to_string_pretty(&view)?);
    }

    let result = store.state(|s| s.result).await;
    tracing::info!(path = name, ?result, "Sign-in path finished");
    Ok(())
}

/// Print host events received since the last call and apply navigation.
fn report(recorder: &mut HostRecorder, stack: &mut InMemoryScreenStack) -> anyhow::Result<()> {
    let before = recorder.events().len();
    recorder.apply_navigation(stack);
    for event in &recorder.events()[before..] {
        println!("  host: {}", serde_json::to_string(event)?);
    }
    println!("  stack: {:?}", stack.screens());
    Ok(())
}
