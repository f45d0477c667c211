//! # Car Templates Testing
//!
//! Testing utilities for screen reducers and the stores that run them.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - Effect assertions (render, navigation, message)
//! - An in-memory screen stack and recording hosts
//!
//! ## Example
//!
//! ```ignore
//! use car_templates_testing::mocks::{HostRecorder, InMemoryScreenStack};
//! use car_templates_runtime::Store;
//!
//! #[tokio::test]
//! async fn skip_pops_the_screen() {
//!     let store = Store::new(SignInFlowState::default(), SignInReducer::new(), env);
//!     let mut recorder = HostRecorder::new(store.subscribe_host_events());
//!     let mut stack = InMemoryScreenStack::with_screens([Screen::Template(TemplateKind::SignIn)]);
//!
//!     store.send(FlowAction::Pressed(SignInAction::Skip)).await?;
//!     recorder.apply_navigation(&mut stack);
//!
//!     assert_eq!(stack.top(), Some(&Screen::Home));
//! }
//! ```


pub use reducer_test::{ReducerTest, assertions};

/// Test doubles for the host side of a screen.
pub mod mocks {
    use car_templates_core::host::{HostEvent, ScreenHost};
    use car_templates_core::navigation::{Navigation, Screen, ScreenStack};
    use std::sync::Mutex;
    use tokio::sync::broadcast;

    /// Vec-backed screen stack rooted at [`Screen::Home`].
    ///
    /// `pop` never removes the root; `finish` clears the stack and marks the
    /// app as finished.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct InMemoryScreenStack {
        screens: Vec<Screen>,
        finished: bool,
    }

    impl InMemoryScreenStack {
        /// A stack holding only the home screen.
        #[must_use]
        pub fn new() -> Self {
            Self {
                screens: vec![Screen::Home],
                finished: false,
            }
        }

        /// Home plus `screens`, pushed in order.
        #[must_use]
        pub fn with_screens(screens: impl IntoIterator<Item = Screen>) -> Self {
            let mut stack = Self::new();
            stack.screens.extend(screens);
            stack
        }

        /// Screens from root to top.
        #[must_use]
        pub fn screens(&self) -> &[Screen] {
            &self.screens
        }

        /// Whether `finish` was called.
        #[must_use]
        pub const fn is_finished(&self) -> bool {
            self.finished
        }
    }

    impl Default for InMemoryScreenStack {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ScreenStack for InMemoryScreenStack {
        fn push(&mut self, screen: Screen) {
            self.screens.push(screen);
        }

        fn pop(&mut self) -> Option<Screen> {
            if self.screens.len() > 1 {
                self.screens.pop()
            } else {
                None
            }
        }

        fn pop_to_root(&mut self) {
            self.screens.truncate(1);
        }

        fn top(&self) -> Option<&Screen> {
            self.screens.last()
        }

        fn depth(&self) -> usize {
            self.screens.len()
        }

        fn finish(&mut self) {
            self.screens.clear();
            self.finished = true;
        }
    }

    /// [`ScreenHost`] that records every call in order.
    #[derive(Debug, Default)]
    pub struct RecordingHost {
        events: Mutex<Vec<HostEvent>>,
    }

    impl RecordingHost {
        /// Create an empty recorder.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Everything received so far.
        #[must_use]
        pub fn events(&self) -> Vec<HostEvent> {
            self.lock().clone()
        }

        /// Number of `invalidate` calls.
        #[must_use]
        pub fn render_count(&self) -> usize {
            self.lock()
                .iter()
                .filter(|e| matches!(e, HostEvent::Render))
                .count()
        }

        /// Navigation commands, in order.
        #[must_use]
        pub fn navigations(&self) -> Vec<Navigation> {
            self.lock()
                .iter()
                .filter_map(|e| match e {
                    HostEvent::Navigate(n) => Some(*n),
                    _ => None,
                })
                .collect()
        }

        /// Messages shown, in order.
        #[must_use]
        pub fn messages(&self) -> Vec<String> {
            self.lock()
                .iter()
                .filter_map(|e| match e {
                    HostEvent::Message(m) => Some(m.clone()),
                    _ => None,
                })
                .collect()
        }

        /// Forget everything recorded so far.
        pub fn clear(&self) {
            self.lock().clear();
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, Vec<HostEvent>> {
            // A panic while holding the lock only happens in a failing test.
            self.events
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }

    impl ScreenHost for RecordingHost {
        fn invalidate(&self) {
            self.lock().push(HostEvent::Render);
        }

        fn navigate(&self, navigation: Navigation) {
            self.lock().push(HostEvent::Navigate(navigation));
        }

        fn show_message(&self, message: &str) {
            self.lock().push(HostEvent::Message(message.to_owned()));
        }
    }

    /// Collects host events published by a store.
    ///
    /// Store sends publish host events before returning, so draining after
    /// an awaited `send` sees all of them.
    #[derive(Debug)]
    pub struct HostRecorder {
        receiver: broadcast::Receiver<HostEvent>,
        events: Vec<HostEvent>,
    }

    impl HostRecorder {
        /// Wrap a receiver from `Store::subscribe_host_events`.
        #[must_use]
        pub const fn new(receiver: broadcast::Receiver<HostEvent>) -> Self {
            Self {
                receiver,
                events: Vec::new(),
            }
        }

        /// Pull every event currently buffered; returns the newly received ones.
        pub fn drain(&mut self) -> &[HostEvent] {
            let start = self.events.len();
            loop {
                match self.receiver.try_recv() {
                    Ok(event) => self.events.push(event),
                    Err(broadcast::error::TryRecvError::Lagged(_)) => {},
                    Err(_) => break,
                }
            }
            &self.events[start..]
        }

        /// All events received so far.
        #[must_use]
        pub fn events(&self) -> &[HostEvent] {
            &self.events
        }

        /// Number of renders received so far.
        #[must_use]
        pub fn render_count(&self) -> usize {
            self.events
                .iter()
                .filter(|e| matches!(e, HostEvent::Render))
                .count()
        }

        /// Drain, then apply newly received navigation commands to `stack`.
        pub fn apply_navigation(&mut self, stack: &mut impl ScreenStack) {
            let navigations: Vec<Navigation> = self
                .drain()
                .iter()
                .filter_map(|e| match e {
                    HostEvent::Navigate(n) => Some(*n),
                    _ => None,
                })
                .collect();
            for navigation in navigations {
                stack.apply(navigation);
            }
        }

        /// Drain, then forward newly received events to `host`.
        pub fn forward_to(&mut self, host: &impl ScreenHost) {
            let fresh = self.drain().to_vec();
            for event in fresh {
                host.deliver(event);
            }
        }
    }
}
