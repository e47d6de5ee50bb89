//! Logging setup.
//!
//! Compact timestamped lines on stderr with per-module levels from
//! `[logging]`. `RUST_LOG` takes precedence over the configuration:
//!
//! ```bash
//! RUST_LOG=debug jxref index
//! RUST_LOG=jxref::ingest=debug jxref index
//! ```

use std::sync::Once;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// HH:MM:SS.mmm
struct CompactTime;

impl FormatTime for CompactTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Filter directives for a logging config
///
/// Bare module names are taken relative to this crate, so `indexer`
/// means `jxref::indexer`.
pub fn filter_directives(config: &LoggingConfig) -> String {
    let mut directives = config.default.clone();
    for (module, level) in &config.modules {
        if module.contains("::") || module == env!("CARGO_CRATE_NAME") {
            directives.push_str(&format!(",{module}={level}"));
        } else {
            directives.push_str(&format!(",{}::{module}={level}", env!("CARGO_CRATE_NAME")));
        }
    }
    directives
}

/// Install the global subscriber; later calls are no-ops
pub fn init_with_config(config: &LoggingConfig) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(filter_directives(config))
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_timer(CompactTime)
            .with_level(true)
            .with_filter(filter);

        // Another subscriber may already be installed (tests, embedders)
        let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
    });
}

/// Install the subscriber with `LoggingConfig::default()`
pub fn init() {
    init_with_config(&LoggingConfig::default());
}
