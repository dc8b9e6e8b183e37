use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::{PlanError, Result};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `log_level`. Logs go to stderr so that
/// `--json` output on stdout stays machine-readable.
pub fn init_logging(log_level: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(env_filter),
        )
        .try_init()
        .map_err(|e| PlanError::InvalidInput(format!("failed to initialize logging: {}", e)))
}
