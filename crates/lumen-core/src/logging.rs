//! Logging setup based on `tracing-subscriber`.

/// Default filter used by [`init`].
pub const DEFAULT_FILTER: &str = "info,lumen_chart=debug";

/// Install a formatted subscriber with the default filter.
///
/// Call once at startup. `RUST_LOG`-style directives can be supplied through
/// [`init_with_filter`] instead.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install a formatted subscriber with a custom env filter.
pub fn init_with_filter(filter: &str) {
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
