//! Request-permission screen.
//!
//! Shown before screens that need location or vehicle data. It lists what
//! is missing, asks the host for it, and moves on once the user answers.
//!
//! # Flow
//!
//! 1. `Check` reads the missing permissions from the gate
//! 2. `Grant` asks the gate; the answer comes back as `PermissionsResult`
//! 3. Approved: open the origin screen (or home). Rejected: go home.
//!    Dismissed: ask again.
//!
//! After an answer the phase is read from the gate again, so the screen is
//! still usable if the host navigates back to it.

use crate::environment::PermissionEnvironment;
use crate::gate::{DeviceKind, PermissionGate, PermissionName, PermissionOutcome, missing_permissions};
use crate::messages;
use car_templates_core::async_effect;
use car_templates_core::effect::Effect;
use car_templates_core::navigation::{HeaderAction, Navigation, Screen, TemplateKind};
use car_templates_core::reducer::Reducer;
use car_templates_core::{SmallVec, smallvec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

type Effects = SmallVec<[Effect<RequestPermissionAction>; 4]>;

/// Launch parameters of the request screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionScreenConfig {
    /// Shown at app start, before any other screen.
    pub pre_seed: bool,
    /// Screen to open once permissions are approved.
    pub origin: Option<TemplateKind>,
}

impl PermissionScreenConfig {
    /// Non-pre-seed screen returning home on approval.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pre_seed: false,
            origin: None,
        }
    }

    /// Set pre-seed mode.
    #[must_use]
    pub const fn with_pre_seed(mut self, pre_seed: bool) -> Self {
        self.pre_seed = pre_seed;
        self
    }

    /// Open `origin` on approval.
    #[must_use]
    pub const fn with_origin(mut self, origin: TemplateKind) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Parameters of a [`Screen::RequestPermission`] route.
    #[must_use]
    pub const fn from_screen(screen: &Screen) -> Option<Self> {
        match *screen {
            Screen::RequestPermission { pre_seed, origin } => Some(Self { pre_seed, origin }),
            _ => None,
        }
    }

    /// Route of a screen with these parameters.
    #[must_use]
    pub const fn screen(self) -> Screen {
        Screen::RequestPermission {
            pre_seed: self.pre_seed,
            origin: self.origin,
        }
    }

    /// App icon in pre-seed mode, back otherwise.
    #[must_use]
    pub const fn header_action(self) -> HeaderAction {
        if self.pre_seed {
            HeaderAction::AppIcon
        } else {
            HeaderAction::Back
        }
    }
}

/// Where the request screen is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum RequestPermissionState {
    /// Not checked yet.
    #[default]
    Unchecked,
    /// The manifest could not be read.
    PackageNotFound,
    /// Nothing is missing.
    AlreadyGranted,
    /// Waiting for the user to press OK.
    NeedsGrant {
        /// Permissions to ask for
        missing: BTreeSet<PermissionName>,
        /// Location services are on
        location_enabled: bool,
    },
    /// The host dialog is open.
    Requesting {
        /// Permissions asked for
        missing: BTreeSet<PermissionName>,
        /// Location services are on
        location_enabled: bool,
    },
}

impl RequestPermissionState {
    /// Lowercase name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Unchecked => "unchecked",
            Self::PackageNotFound => "package_not_found",
            Self::AlreadyGranted => "already_granted",
            Self::NeedsGrant { .. } => "needs_grant",
            Self::Requesting { .. } => "requesting",
        }
    }
}

/// State of one request screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionScreenState {
    /// Launch parameters.
    pub config: PermissionScreenConfig,
    /// Current phase.
    pub phase: RequestPermissionState,
    /// The handheld guidance toast was already shown.
    pub guidance_shown: bool,
}

impl PermissionScreenState {
    /// Unchecked screen with `config`.
    #[must_use]
    pub fn new(config: PermissionScreenConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }
}

/// Everything the request screen handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestPermissionAction {
    /// Screen shown: read permissions.
    Check,
    /// Read permissions again after a failure.
    Retry,
    /// Primary OK: ask the host.
    Grant,
    /// OK on the already-granted message: close the screen.
    Ok,
    /// Back out without asking.
    Cancel,
    /// Open the system location settings.
    OpenLocationSettings,
    /// The host answered.
    PermissionsResult(PermissionOutcome),
}

/// Buttons the request screen can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionButton {
    /// Re-check after a manifest failure
    Retry,
    /// Close the screen
    Ok,
    /// Ask for permissions
    Grant,
    /// Back out
    Cancel,
    /// Open location settings
    LocationSettings,
}

impl PermissionButton {
    /// Button label.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Retry => "Retry",
            Self::Ok | Self::Grant => "OK",
            Self::Cancel => "Cancel",
            Self::LocationSettings => "Mobile",
        }
    }

    /// Action sent when pressed.
    #[must_use]
    pub const fn action(self) -> RequestPermissionAction {
        match self {
            Self::Retry => RequestPermissionAction::Retry,
            Self::Ok => RequestPermissionAction::Ok,
            Self::Grant => RequestPermissionAction::Grant,
            Self::Cancel => RequestPermissionAction::Cancel,
            Self::LocationSettings => RequestPermissionAction::OpenLocationSettings,
        }
    }
}

/// What the host renders for the request screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPermissionView {
    /// Header action
    pub header: HeaderAction,
    /// Title, on the request message only
    pub title: Option<String>,
    /// Body text
    pub message: String,
    /// Buttons
    pub actions: Vec<PermissionButton>,
    /// Highlighted button
    pub primary_action: Option<PermissionButton>,
    /// Action strip (top right)
    pub strip_actions: Vec<PermissionButton>,
    /// Permissions that will be asked for
    pub missing: Vec<PermissionName>,
}

impl RequestPermissionView {
    /// Describe the screen for `state`.
    #[must_use]
    pub fn new(state: &PermissionScreenState) -> Self {
        let mut view = Self {
            header: state.config.header_action(),
            title: None,
            message: String::new(),
            actions: Vec::new(),
            primary_action: None,
            strip_actions: Vec::new(),
            missing: Vec::new(),
        };

        match &state.phase {
            RequestPermissionState::Unchecked => {},
            RequestPermissionState::PackageNotFound => {
                view.message = messages::PACKAGE_NOT_FOUND.to_string();
                view.actions = vec![PermissionButton::Retry];
                view.primary_action = Some(PermissionButton::Retry);
            },
            RequestPermissionState::AlreadyGranted => {
                view.message = messages::ALREADY_GRANTED.to_string();
                view.actions = vec![PermissionButton::Ok];
            },
            RequestPermissionState::NeedsGrant {
                missing,
                location_enabled,
            } => {
                view.title = Some(messages::ENABLE_PERMISSION_TITLE.to_string());
                view.message = messages::REQUEST_PERMISSION_MESSAGE.to_string();
                view.actions = vec![PermissionButton::Grant, PermissionButton::Cancel];
                view.primary_action = Some(PermissionButton::Grant);
                if !location_enabled {
                    view.strip_actions = vec![PermissionButton::LocationSettings];
                }
                view.missing = missing.iter().cloned().collect();
            },
            RequestPermissionState::Requesting { missing, .. } => {
                view.title = Some(messages::ENABLE_PERMISSION_TITLE.to_string());
                view.message = messages::REQUEST_PERMISSION_MESSAGE.to_string();
                view.missing = missing.iter().cloned().collect();
            },
        }

        view
    }
}

/// Request-permission screen reducer.
#[derive(Debug, Clone)]
pub struct RequestPermissionReducer<P> {
    _phantom: std::marker::PhantomData<P>,
}

impl<P> RequestPermissionReducer<P> {
    /// Create a new request-permission reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<P> Default for RequestPermissionReducer<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> RequestPermissionReducer<P>
where
    P: PermissionGate + Clone + 'static,
{
    /// Phase the gate currently implies.
    fn read_phase(env: &PermissionEnvironment<P>) -> RequestPermissionState {
        match missing_permissions(&env.gate) {
            Err(error) => {
                tracing::warn!(%error, "Cannot read declared permissions");
                RequestPermissionState::PackageNotFound
            },
            Ok(missing) if missing.is_empty() => RequestPermissionState::AlreadyGranted,
            Ok(missing) => RequestPermissionState::NeedsGrant {
                missing,
                location_enabled: env.gate.location_enabled(),
            },
        }
    }

    fn check(state: &mut PermissionScreenState, env: &PermissionEnvironment<P>) -> Effects {
        let from = state.phase.name();
        state.phase = Self::read_phase(env);
        tracing::debug!(from, to = state.phase.name(), "Permission check");
        smallvec![Effect::Render]
    }

    fn grant(state: &mut PermissionScreenState, env: &PermissionEnvironment<P>) -> Effects {
        let (missing, location_enabled) = match std::mem::take(&mut state.phase) {
            RequestPermissionState::NeedsGrant {
                missing,
                location_enabled,
            } => (missing, location_enabled),
            other => {
                tracing::debug!(phase = other.name(), "Nothing to grant");
                state.phase = other;
                return SmallVec::new();
            },
        };

        tracing::debug!(count = missing.len(), "Requesting permissions");
        let gate = env.gate.clone();
        let request = missing.clone();
        state.phase = RequestPermissionState::Requesting {
            missing,
            location_enabled,
        };

        let mut effects: Effects = smallvec![
            Effect::Render,
            async_effect! {
                let outcome = gate.request_permissions(request).await;
                Some(RequestPermissionAction::PermissionsResult(outcome))
            },
        ];
        effects.extend(Self::phone_guidance(state, env));
        effects
    }

    fn resolve(
        state: &mut PermissionScreenState,
        outcome: PermissionOutcome,
        env: &PermissionEnvironment<P>,
    ) -> Effects {
        let (missing, location_enabled) = match std::mem::take(&mut state.phase) {
            RequestPermissionState::Requesting {
                missing,
                location_enabled,
            } => (missing, location_enabled),
            other => {
                tracing::warn!(phase = other.name(), "Permission result without a request");
                state.phase = other;
                return SmallVec::new();
            },
        };

        if !outcome.approved.is_empty() {
            tracing::info!(approved = outcome.approved.len(), "Permissions approved");
            state.phase = Self::read_phase(env);
            let navigation = match state.config.origin {
                Some(origin) => Navigation::Replace(Screen::Template(origin)),
                None => Navigation::Push(Screen::Home),
            };
            smallvec![Effect::message(messages::APPROVED), Effect::Navigate(navigation)]
        } else if !outcome.rejected.is_empty() {
            tracing::warn!(rejected = outcome.rejected.len(), "Permissions rejected");
            state.phase = Self::read_phase(env);
            smallvec![
                Effect::message(messages::REJECTED),
                Effect::Navigate(Navigation::Push(Screen::Home)),
            ]
        } else {
            tracing::debug!("Permission dialog dismissed");
            state.phase = RequestPermissionState::NeedsGrant {
                missing,
                location_enabled,
            };
            smallvec![Effect::Render]
        }
    }

    /// Guidance toast for handheld devices, at most once per screen.
    fn phone_guidance(
        state: &mut PermissionScreenState,
        env: &PermissionEnvironment<P>,
    ) -> Option<Effect<RequestPermissionAction>> {
        if env.gate.device_kind() != DeviceKind::Handheld || state.guidance_shown {
            return None;
        }
        state.guidance_shown = true;
        Some(Effect::message(messages::PHONE_SCREEN_GUIDANCE))
    }
}

impl<P> Reducer for RequestPermissionReducer<P>
where
    P: PermissionGate + Clone + 'static,
{
    type State = PermissionScreenState;
    type Action = RequestPermissionAction;
    type Environment = PermissionEnvironment<P>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            RequestPermissionAction::Check | RequestPermissionAction::Retry
                if !matches!(state.phase, RequestPermissionState::Requesting { .. }) =>
            {
                Self::check(state, env)
            },
            RequestPermissionAction::Grant => Self::grant(state, env),
            RequestPermissionAction::PermissionsResult(outcome) => Self::resolve(state, outcome, env),
            RequestPermissionAction::Ok
                if matches!(state.phase, RequestPermissionState::AlreadyGranted) =>
            {
                smallvec![Effect::Navigate(Navigation::Pop)]
            },
            RequestPermissionAction::Cancel
                if matches!(state.phase, RequestPermissionState::NeedsGrant { .. }) =>
            {
                tracing::info!("Permission request cancelled");
                smallvec![
                    Effect::message(messages::PERMISSION_CANCELLED),
                    Effect::Navigate(Navigation::Push(Screen::Home)),
                ]
            },
            RequestPermissionAction::OpenLocationSettings
                if matches!(
                    state.phase,
                    RequestPermissionState::NeedsGrant {
                        location_enabled: false,
                        ..
                    }
                ) =>
            {
                let mut effects: Effects =
                    smallvec![Effect::Navigate(Navigation::Push(Screen::LocationSettings))];
                effects.extend(Self::phone_guidance(state, env));
                effects
            },
            action => {
                tracing::debug!(?action, phase = state.phase.name(), "Action not available in this phase");
                SmallVec::new()
            },
        }
    }
}
