use tracing_subscriber::EnvFilter;

/// Only this crate's own events by default. isahc logs a warning for every
/// failed request, which would flood stderr when the target is down.
pub const DEFAULT_LOG_FILTER: &str = "load=info";

/// `RUST_LOG` if set and valid, otherwise [`DEFAULT_LOG_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

pub fn init() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).with_writer(std::io::stderr).init();
}
