//! Logging integration for the relmap engine.
//!
//! Provides a helper for configuring [`tracing`]-based logging. The engine
//! core itself only emits `tracing` events; installing a subscriber is the
//! embedding application's choice.

/// Sets up the global tracing subscriber.
///
/// `level` is an env-filter directive (e.g. `"debug"`, `"info"`,
/// `"relmap_db=trace"`). With `debug` set, a pretty human-readable format is
/// used; otherwise a structured JSON format suitable for log aggregation.
///
/// Installing a second subscriber is a no-op rather than a panic, so test
/// binaries may call this freely.
pub fn setup_logging(level: &str, debug: bool) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    if debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one mapping operation.
///
/// Attach this around a mapper invocation so all events emitted while
/// hydrating a result set carry the root model's name.
///
/// # Examples
///
/// ```
/// use relmap_core::logging::mapping_span;
///
/// let span = mapping_span("User");
/// let _guard = span.enter();
/// tracing::debug!("mapping rows");
/// ```
pub fn mapping_span(model: &str) -> tracing::Span {
    tracing::debug_span!("map_result", model = model)
}
