use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::presentation::config::{Environment, LoggingSettings};

const DEFAULT_DIRECTIVES: &str = "moodtune=debug,tower_http=debug";

/// Initialize the tracing subscriber with structured logging.
///
/// `RUST_LOG` wins over `logging.level` when set.
pub fn init_tracing(settings: &LoggingSettings, environment: Environment) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},{}", settings.level, DEFAULT_DIRECTIVES))
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    if settings.enable_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    }

    tracing::info!(
        environment = %environment,
        json_format = settings.enable_json,
        "Tracing initialized"
    );
}
