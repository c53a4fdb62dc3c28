// Logger initialization

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::running_in_lambda;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. Colours are turned off inside
/// Lambda where output lands in CloudWatch.
pub fn init_logger() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "file_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_ansi(!running_in_lambda()))
        .init();
}
