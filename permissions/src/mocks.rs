//! Mock permission gate for testing.

use crate::error::{PermissionError, Result};
use crate::gate::{DeviceKind, PermissionGate, PermissionName, PermissionOutcome};
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// How the mock answers requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MockDecision {
    /// Approve everything asked for (and mark it granted).
    #[default]
    ApproveAll,
    /// Reject everything asked for.
    RejectAll,
    /// Close the dialog without answering.
    Dismiss,
}

#[derive(Debug, Default)]
struct GateState {
    declared: BTreeSet<PermissionName>,
    granted: BTreeSet<PermissionName>,
    package_missing: bool,
    device: DeviceKind,
    location_disabled: bool,
    decision: MockDecision,
    requests: Vec<BTreeSet<PermissionName>>,
}

/// In-memory permission gate.
///
/// Clones share state, so a test can keep a handle after moving the gate
/// into an environment and inspect the requests made through it.
#[derive(Debug, Clone, Default)]
pub struct MockPermissionGate {
    inner: Arc<Mutex<GateState>>,
}

impl MockPermissionGate {
    /// Automotive device, nothing declared, location on, approving requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `permissions` in the manifest.
    #[must_use]
    pub fn with_declared<I>(self, permissions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PermissionName>,
    {
        self.lock().declared.extend(permissions.into_iter().map(Into::into));
        self
    }

    /// Mark `permissions` as granted.
    #[must_use]
    pub fn with_granted<I>(self, permissions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PermissionName>,
    {
        self.lock().granted.extend(permissions.into_iter().map(Into::into));
        self
    }

    /// Fail manifest reads with `PackageNotFound`.
    #[must_use]
    pub fn without_package(self) -> Self {
        self.lock().package_missing = true;
        self
    }

    /// Run as a phone projecting to the car.
    #[must_use]
    pub fn handheld(self) -> Self {
        self.lock().device = DeviceKind::Handheld;
        self
    }

    /// Report location services as switched off.
    #[must_use]
    pub fn location_disabled(self) -> Self {
        self.lock().location_disabled = true;
        self
    }

    /// Answer requests with `decision`.
    #[must_use]
    pub fn deciding(self, decision: MockDecision) -> Self {
        self.lock().decision = decision;
        self
    }

    /// Every request made so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<BTreeSet<PermissionName>> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn decide(&self, permissions: BTreeSet<PermissionName>) -> PermissionOutcome {
        let mut state = self.lock();
        state.requests.push(permissions.clone());
        let decision = state.decision;
        match decision {
            MockDecision::ApproveAll => {
                state.granted.extend(permissions.iter().cloned());
                PermissionOutcome::approve_all(permissions)
            },
            MockDecision::RejectAll => PermissionOutcome::reject_all(permissions),
            MockDecision::Dismiss => PermissionOutcome::default(),
        }
    }
}

impl PermissionGate for MockPermissionGate {
    fn declared_permissions(&self) -> Result<BTreeSet<PermissionName>> {
        let state = self.lock();
        if state.package_missing {
            return Err(PermissionError::PackageNotFound);
        }
        Ok(state.declared.clone())
    }

    fn is_granted(&self, permission: &PermissionName) -> bool {
        self.lock().granted.contains(permission)
    }

    fn request_permissions(
        &self,
        permissions: BTreeSet<PermissionName>,
    ) -> impl Future<Output = PermissionOutcome> + Send {
        let outcome = self.decide(permissions);
        async move { outcome }
    }

    fn device_kind(&self) -> DeviceKind {
        self.lock().device
    }

    fn location_enabled(&self) -> bool {
        !self.lock().location_disabled
    }
}
