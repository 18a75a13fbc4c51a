//! Tracing setup shared by frontends.
//!
//! Log output goes to stderr so that stdout carries only the report.

use std::sync::Once;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` is used (e.g.
/// `"warn"`, or `"debug"` for verbose runs). Subsequent calls are ignored.
pub fn init_tracing(default_level: &str) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

        // A subscriber may already be installed by an embedding application.
        let _ = tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init();
    });
}
