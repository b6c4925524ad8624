//! Logging setup for hosts embedding the plugin core.
//!
//! Initializes tracing-subscriber with env-filter support; `RUST_LOG`
//! overrides the configured level when set.

use crate::config::LoggingSettings;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the logging system with the given settings.
///
/// `json_format` forces structured JSON output regardless of the config
/// value (hosts typically wire this to a CLI flag). Calling this twice
/// fails, as only one global subscriber may be installed.
pub fn setup_logging(
    config: &LoggingSettings,
    json_format: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let registry = tracing_subscriber::registry().with(filter);

    if json_format || config.json_format {
        registry
            .with(fmt::layer().json().with_file(false).with_line_number(false))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_ansi(true).with_file(false).with_line_number(false))
            .try_init()?;
    }

    info!("logging initialized with level: {}", config.level);
    Ok(())
}
