use tracing_subscriber::EnvFilter;

use crate::AnalysisConfig;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.level` when set. Calling this twice is harmless.
pub fn setup_logging(config: &AnalysisConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    match installed {
        Ok(()) => tracing::debug!(
            level = %config.logging.level,
            json = config.logging.json,
            "logging initialized"
        ),
        Err(err) => tracing::debug!(error = %err, "tracing subscriber already installed"),
    }
}
