//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust
/// use car_templates_core::async_effect;
/// use car_templates_core::effect::Effect;
///
/// #[derive(Debug)]
/// enum ScreenAction {
///     Loaded { value: i32 },
/// }
///
/// let effect: Effect<ScreenAction> = async_effect! {
///     Some(ScreenAction::Loaded { value: 42 })
/// };
/// assert!(matches!(effect, Effect::Future(_)));
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
