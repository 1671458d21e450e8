//! Logging bootstrap.

use anyhow::Context;
use bookstore_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `telemetry.log_level` when set. Calling this twice is an
/// error.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = build_filter(settings)?;

    let result = match settings.log_format {
        LogFormat::Pretty => fmt().with_env_filter(filter).with_target(true).try_init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init(),
    };

    result
        .map_err(|error| anyhow::anyhow!("{error}"))
        .context("failed to install tracing subscriber")?;

    tracing::info!(
        target: "bookstore-telemetry",
        format = ?settings.log_format,
        "telemetry initialized"
    );
    Ok(())
}

fn build_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.log_level)
            .with_context(|| format!("invalid telemetry.log_level '{}'", settings.log_level)),
    }
}
