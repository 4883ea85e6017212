//! Tracing setup for the binary. Log lines go to stderr so the report on
//! stdout can be piped.

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = "hustle";

fn verbosity(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    }
}

/// Only this crate's spans and events pass; dependencies stay quiet.
fn app_targets(verbose: bool) -> Targets {
    Targets::new().with_target(APP_TARGET, verbosity(verbose))
}

/// Installs the global subscriber. Silent unless `verbose` is set; `RUST_LOG`
/// can narrow the output further.
pub fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(verbosity(verbose).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(app_targets(verbose))
        .with(env_filter)
        .try_init()
        .context("Failed to install the tracing subscriber")
}
