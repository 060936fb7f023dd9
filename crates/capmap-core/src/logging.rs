//! Tracing subscriber bootstrap.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Install a global `fmt` subscriber filtered by `CAPMAP_LOG`
/// (falling back to `default_directive`, e.g. `"info"`).
///
/// Safe to call more than once; only the first call installs anything, and an
/// already-installed global subscriber from the host application is left alone.
pub fn init_tracing(default_directive: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(default_directive));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
    });
}
