//! Telemetry facade: installs the global `tracing` subscriber.

use bibliotech_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing/logging pipeline.
///
/// `RUST_LOG` takes precedence over the configured filter. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn init(settings: &TelemetrySettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = match settings.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().flatten_event(true))
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            target: "bibliotech-telemetry",
            format = ?settings.log_format,
            filter = %settings.log_filter,
            "telemetry initialized"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_does_not_panic() {
        let settings = TelemetrySettings {
            log_format: LogFormat::Json,
            log_filter: "not a [valid filter".to_string(),
        };
        init(&settings);
        init(&TelemetrySettings::default());
    }
}
