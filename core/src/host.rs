//! The host side of a screen.
//!
//! Reducers never call the host directly. They return render, navigation and
//! message effects; whatever embeds the reducer turns those into
//! [`HostEvent`]s and hands them to a [`ScreenHost`].

use crate::effect::Effect;
use crate::navigation::Navigation;
use serde::{Deserialize, Serialize};

/// A notification for the host, produced from a host effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostEvent {
    /// Rebuild the current template
    Render,
    /// Apply a screen-stack command
    Navigate(Navigation),
    /// Show a transient message
    Message(String),
}

impl HostEvent {
    /// Convert a host effect into an event.
    ///
    /// Non-host effects (`None`, `Future`) are handed back unchanged.
    ///
    /// # Errors
    ///
    /// Returns the original effect if it is not a host effect.
    pub fn try_from_effect<A>(effect: Effect<A>) -> Result<Self, Effect<A>> {
        match effect {
            Effect::Render => Ok(Self::Render),
            Effect::Navigate(navigation) => Ok(Self::Navigate(navigation)),
            Effect::ShowMessage(message) => Ok(Self::Message(message)),
            other => Err(other),
        }
    }

    /// Short label for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Render => "render",
            Self::Navigate(_) => "navigate",
            Self::Message(_) => "message",
        }
    }
}

/// Capability provided by the rendering host.
///
/// Delivery is fire-and-forget: implementations may render synchronously or
/// queue the request.
pub trait ScreenHost {
    /// Request a re-render of the current screen.
    fn invalidate(&self);

    /// Apply a screen-stack command.
    fn navigate(&self, navigation: Navigation);

    /// Show a transient message.
    fn show_message(&self, message: &str);

    /// Route an event to the matching capability.
    fn deliver(&self, event: HostEvent) {
        match event {
            HostEvent::Render => self.invalidate(),
            HostEvent::Navigate(navigation) => self.navigate(navigation),
            HostEvent::Message(message) => self.show_message(&message),
        }
    }
}
