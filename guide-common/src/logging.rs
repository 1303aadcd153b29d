//! Tracing subscriber initialisation

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the env filter: RUST_LOG wins, otherwise `default_directives`
pub fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// Initialize the global tracing subscriber
///
/// Returns false if a subscriber was already installed (tests, embedding apps).
pub fn init_tracing(default_directives: &str) -> bool {
    tracing_subscriber::registry()
        .with(env_filter(default_directives))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
