use std::env;
use std::io;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{filter, fmt, Layer, Registry};

/// Overrides `--log-level` when set, e.g. `MARKVIEW_LOG=debug`.
pub const LOG_ENV: &str = "MARKVIEW_LOG";

pub fn level(cli_level: &str) -> LevelFilter {
    env::var(LOG_ENV)
        .ok()
        .and_then(|value| LevelFilter::from_str(value.trim()).ok())
        .or_else(|| LevelFilter::from_str(cli_level).ok())
        .unwrap_or(LevelFilter::WARN)
}

/// Install a stderr subscriber. Stdout is reserved for the document.
pub fn start(level: LevelFilter) {
    let fmt_filter = filter::Targets::new()
        .with_target("markview_engine", level)
        .with_target("markview", level)
        .with_default(LevelFilter::WARN);
    let fmt = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(fmt_filter);

    let subscriber = Registry::default().with(fmt);
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Logging disabled: {}", err);
    }
}
