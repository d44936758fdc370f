use crate::config::{LogConfig, LogFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_FILTER: &str = "sakila=info,sakila_web=info,tower_http=info";

/// Install the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn init(cfg: &LogConfig) {
    let fallback = cfg.filter.as_deref().unwrap_or(DEFAULT_FILTER);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let registry = tracing_subscriber::registry().with(filter);
    match cfg.format {
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().with_target(true).compact())
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().with_target(true).json())
            .init(),
    }
}
