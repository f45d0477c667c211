//! Permission environment.

use crate::gate::PermissionGate;

/// Dependencies of the permission screens.
///
/// # Type Parameters
///
/// - `P`: Permission gate (cloned into request effects)
#[derive(Debug, Clone)]
pub struct PermissionEnvironment<P>
where
    P: PermissionGate + Clone,
{
    /// Host permission gate.
    pub gate: P,
}

impl<P> PermissionEnvironment<P>
where
    P: PermissionGate + Clone,
{
    /// Create a new permission environment.
    #[must_use]
    pub const fn new(gate: P) -> Self {
        Self { gate }
    }
}
