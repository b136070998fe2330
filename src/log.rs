//! Tracing installation.
//!
//! The renderer reports through `tracing`. Registrations, instantiations and
//! new tree generations are logged at `debug`, pass-through tags at `trace`.
//! Lost or duplicated injections are warnings and failing definitions errors.
//! Applications that already install a subscriber need nothing from this module.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the log filter, in `EnvFilter` syntax.
pub const LOG_ENV: &str = "CASCADE_LOG";

/// Filter used when [`LOG_ENV`] is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

static TRACING_INSTALLED: Once = Once::new();

/// Installs a formatted stderr subscriber filtered by [`LOG_ENV`] (idempotent).
pub fn install_tracing() {
    install_tracing_with(DEFAULT_FILTER);
}

/// Like [`install_tracing`], with a custom fallback filter such as
/// `"cascade_core=trace"`.
pub fn install_tracing_with(fallback: &str) {
    TRACING_INSTALLED.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
        let console = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(filter);

        if tracing_subscriber::registry().with(console).try_init().is_err() {
            eprintln!("cascade tracing subscriber failed to initialize");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_is_idempotent() {
        install_tracing();
        install_tracing_with("cascade_core=trace");
        assert!(TRACING_INSTALLED.is_completed());
    }
}
