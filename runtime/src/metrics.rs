//! Metric names recorded by the store.
//!
//! The runtime only records through the `metrics` facade. Installing a
//! recorder (Prometheus, statsd, a test recorder) is up to the application;
//! without one every call is a no-op.

use metrics::{Unit, describe_counter, describe_histogram};

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Actions processed by `Store::send`.
pub const COMMANDS_TOTAL: &str = "store.commands.total";

/// Actions rejected because the store was shutting down.
pub const REJECTED_ACTIONS: &str = "store.shutdown.rejected_actions";

/// Time spent inside `Reducer::reduce`.
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Number of effects returned per reduction.
pub const EFFECTS_COUNT: &str = "store.effects.count";

/// Effects executed, labelled by `type`.
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";

/// Host events published, labelled by `kind`.
pub const HOST_EVENTS_TOTAL: &str = "store.host_events.total";

/// Register descriptions for every store metric.
///
/// Call once after installing a recorder.
pub fn register_metrics() {
    describe_counter!(COMMANDS_TOTAL, Unit::Count, "Actions processed by the store");
    describe_counter!(
        REJECTED_ACTIONS,
        Unit::Count,
        "Actions rejected during shutdown"
    );
    describe_histogram!(
        REDUCER_DURATION,
        Unit::Seconds,
        "Time spent reducing a single action"
    );
    describe_histogram!(EFFECTS_COUNT, Unit::Count, "Effects returned per action");
    describe_counter!(EFFECTS_EXECUTED, Unit::Count, "Effects executed by type");
    describe_counter!(
        HOST_EVENTS_TOTAL,
        Unit::Count,
        "Render, navigation and message events published to the host"
    );
}
