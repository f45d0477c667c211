//! Screen routes and the screen-stack contract.
//!
//! The host owns the back stack; screens only describe where to go. A
//! [`Navigation`] command is produced by a reducer as
//! [`Effect::Navigate`](crate::effect::Effect::Navigate) and applied by a
//! [`ScreenStack`] implementation provided by the host.

use serde::{Deserialize, Serialize};

/// The template examples reachable from the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateKind {
    /// List template
    List,
    /// Grid template
    Grid,
    /// Message template
    Message,
    /// Long message template
    LongMessage,
    /// Pane template
    Pane,
    /// Map template
    Map,
    /// Place list map template
    PlaceListMap,
    /// Navigation template
    Navigation,
    /// Search template
    Search,
    /// Sign-in template
    SignIn,
    /// Route preview template
    RoutePreview,
    /// Navigation template with an alert
    NavigationWithAlert,
    /// Template restriction demo
    TemplateRestrictions,
}

impl TemplateKind {
    /// Rows shown on the home screen, in display order.
    pub const HOME_CATALOG: [Self; 12] = [
        Self::List,
        Self::Grid,
        Self::Message,
        Self::LongMessage,
        Self::Pane,
        Self::Map,
        Self::Navigation,
        Self::Search,
        Self::SignIn,
        Self::RoutePreview,
        Self::NavigationWithAlert,
        Self::TemplateRestrictions,
    ];

    /// Human-readable title used for home rows and error screens.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::List => "List Template",
            Self::Grid => "Grid Template",
            Self::Message => "Message Template",
            Self::LongMessage => "Long Message Template",
            Self::Pane => "Pane Template",
            Self::Map => "Map Template",
            Self::PlaceListMap => "Place List Map Template",
            Self::Navigation => "Navigation Template",
            Self::Search => "Search Template",
            Self::SignIn => "Sign-In Template",
            Self::RoutePreview => "Route Preview Template",
            Self::NavigationWithAlert => "Navigation Template With Alert",
            Self::TemplateRestrictions => "Template Restrictions",
        }
    }
}

/// Which long-form text a long-message screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LongMessageKind {
    /// Terms of service
    TermsOfService,
    /// Privacy policy
    PrivacyPolicy,
}

/// A screen the host can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    /// The template catalog (root screen)
    Home,
    /// One of the template examples
    Template(TemplateKind),
    /// Permission pre-flight screen
    RequestPermission {
        /// Launched before any other screen; shows the app icon instead of back.
        pre_seed: bool,
        /// Screen to open once permissions are approved.
        origin: Option<TemplateKind>,
    },
    /// Long-form text (terms, privacy)
    LongMessage(LongMessageKind),
    /// Generic failure screen with a retry back to `origin`
    Error {
        /// Screen the retry action re-opens.
        origin: TemplateKind,
    },
    /// The system location settings (outside the app)
    LocationSettings,
}

impl Screen {
    /// Screen re-opened by the retry action, if this screen has one.
    #[must_use]
    pub const fn retry_target(&self) -> Option<Self> {
        match self {
            Self::Error { origin } => Some(Self::Template(*origin)),
            _ => None,
        }
    }
}

/// Action drawn in a template header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderAction {
    /// Back arrow; pops the screen
    Back,
    /// Application icon; not clickable
    AppIcon,
}

/// A command applied to the host's screen stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Navigation {
    /// Push a screen on top of the stack
    Push(Screen),
    /// Pop the top screen (the root is never popped)
    Pop,
    /// Pop everything above the root
    PopToRoot,
    /// Pop the top screen, then push another
    Replace(Screen),
    /// Exit the app
    Finish,
}

/// Host-provided back stack.
///
/// Implementations keep at least one screen (the root) while the app runs:
/// [`ScreenStack::pop`] on a single-screen stack does nothing.
pub trait ScreenStack {
    /// Push a screen on top of the stack.
    fn push(&mut self, screen: Screen);

    /// Pop the top screen; returns it unless it is the root.
    fn pop(&mut self) -> Option<Screen>;

    /// Pop everything above the root.
    fn pop_to_root(&mut self);

    /// The screen currently shown.
    fn top(&self) -> Option<&Screen>;

    /// Number of screens on the stack.
    fn depth(&self) -> usize;

    /// Exit the app, clearing the stack.
    fn finish(&mut self);

    /// Apply a navigation command.
    fn apply(&mut self, navigation: Navigation) {
        match navigation {
            Navigation::Push(screen) => self.push(screen),
            Navigation::Pop => {
                self.pop();
            },
            Navigation::PopToRoot => self.pop_to_root(),
            Navigation::Replace(screen) => {
                self.pop();
                self.push(screen);
            },
            Navigation::Finish => self.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct VecStack(Vec<Screen>);

    impl ScreenStack for VecStack {
        fn push(&mut self, screen: Screen) {
            self.0.push(screen);
        }

        fn pop(&mut self) -> Option<Screen> {
            if self.0.len() > 1 { self.0.pop() } else { None }
        }

        fn pop_to_root(&mut self) {
            self.0.truncate(1);
        }

        fn top(&self) -> Option<&Screen> {
            self.0.last()
        }

        fn depth(&self) -> usize {
            self.0.len()
        }

        fn finish(&mut self) {
            self.0.clear();
        }
    }

    #[test]
    fn replace_pops_then_pushes() {
        let mut stack = VecStack(vec![Screen::Home, Screen::Template(TemplateKind::Grid)]);
        stack.apply(Navigation::Replace(Screen::Template(TemplateKind::SignIn)));

        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top(), Some(&Screen::Template(TemplateKind::SignIn)));
    }

    #[test]
    fn pop_keeps_root() {
        let mut stack = VecStack(vec![Screen::Home]);
        stack.apply(Navigation::Pop);
        assert_eq!(stack.top(), Some(&Screen::Home));
    }

    #[test]
    fn error_screen_retries_origin() {
        let screen = Screen::Error { origin: TemplateKind::Map };
        assert_eq!(screen.retry_target(), Some(Screen::Template(TemplateKind::Map)));
        assert_eq!(Screen::Home.retry_target(), None);
    }

    #[test]
    fn home_catalog_includes_sign_in() {
        assert!(TemplateKind::HOME_CATALOG.contains(&TemplateKind::SignIn));
        assert_eq!(TemplateKind::SignIn.title(), "Sign-In Template");
    }
}
