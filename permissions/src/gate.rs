//! Host-provided permission gate.
//!
//! The gate is the only way a screen learns which permissions the app
//! declares and holds, and the only way to ask for more. Requests are
//! asynchronous: the host shows its own dialog (on the head unit, or on the
//! phone for projected apps) and reports back once.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;

/// Permissions under this prefix belong to the car app host and count as
/// granted even when the system reports otherwise.
pub const HOST_PERMISSION_PREFIX: &str = "androidx.car.app";

/// A permission name as declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionName(String);

impl PermissionName {
    /// Precise location.
    pub const ACCESS_FINE_LOCATION: &'static str = "android.permission.ACCESS_FINE_LOCATION";

    /// Approximate location.
    pub const ACCESS_COARSE_LOCATION: &'static str = "android.permission.ACCESS_COARSE_LOCATION";

    /// Wrap a permission name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// [`Self::ACCESS_FINE_LOCATION`]
    #[must_use]
    pub fn fine_location() -> Self {
        Self::new(Self::ACCESS_FINE_LOCATION)
    }

    /// [`Self::ACCESS_COARSE_LOCATION`]
    #[must_use]
    pub fn coarse_location() -> Self {
        Self::new(Self::ACCESS_COARSE_LOCATION)
    }

    /// The name as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for permissions owned by the car app host.
    #[must_use]
    pub fn is_host_permission(&self) -> bool {
        self.0.starts_with(HOST_PERMISSION_PREFIX)
    }
}

impl From<&str> for PermissionName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for PermissionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What kind of device runs the app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    /// Built into the car; dialogs show on the head unit.
    #[default]
    Automotive,
    /// A phone projecting to the car; dialogs show on the phone.
    Handheld,
}

/// Answer to one permission request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOutcome {
    /// Permissions the user granted.
    pub approved: BTreeSet<PermissionName>,
    /// Permissions the user denied.
    pub rejected: BTreeSet<PermissionName>,
}

impl PermissionOutcome {
    /// Everything in `permissions` approved.
    #[must_use]
    pub fn approve_all(permissions: BTreeSet<PermissionName>) -> Self {
        Self {
            approved: permissions,
            rejected: BTreeSet::new(),
        }
    }

    /// Everything in `permissions` rejected.
    #[must_use]
    pub fn reject_all(permissions: BTreeSet<PermissionName>) -> Self {
        Self {
            approved: BTreeSet::new(),
            rejected: permissions,
        }
    }

    /// `true` when the dialog was dismissed without an answer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.approved.is_empty() && self.rejected.is_empty()
    }
}

/// Permission gate.
///
/// This trait abstracts over the host's permission APIs.
pub trait PermissionGate: Send + Sync {
    /// Everything the application declares.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::PackageNotFound`](crate::PermissionError::PackageNotFound)
    /// if the host cannot read the manifest.
    fn declared_permissions(&self) -> Result<BTreeSet<PermissionName>>;

    /// Whether `permission` is currently granted.
    fn is_granted(&self, permission: &PermissionName) -> bool;

    /// Ask the user for `permissions`.
    ///
    /// Resolves exactly once with the approved and rejected sets.
    fn request_permissions(
        &self,
        permissions: BTreeSet<PermissionName>,
    ) -> impl Future<Output = PermissionOutcome> + Send;

    /// Where the permission dialog will appear.
    fn device_kind(&self) -> DeviceKind;

    /// Whether location services are switched on.
    fn location_enabled(&self) -> bool;
}

/// Declared permissions that are not granted, host permissions excluded.
///
/// # Errors
///
/// Propagates the gate's [`PermissionError`](crate::PermissionError).
pub fn missing_permissions<P>(gate: &P) -> Result<BTreeSet<PermissionName>>
where
    P: PermissionGate + ?Sized,
{
    let missing = gate
        .declared_permissions()?
        .into_iter()
        .filter(|permission| !permission.is_host_permission())
        .filter(|permission| !gate.is_granted(permission))
        .collect();
    Ok(missing)
}

/// `true` if either location permission is granted.
#[must_use]
pub fn has_location_permission<P>(gate: &P) -> bool
where
    P: PermissionGate + ?Sized,
{
    gate.is_granted(&PermissionName::fine_location())
        || gate.is_granted(&PermissionName::coarse_location())
}
