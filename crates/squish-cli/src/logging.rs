//! Tracing setup for the CLI.
//!
//! The library crates never log; per-file diagnostics flow through the
//! reporter and are forwarded to `tracing` here in the CLI. Everything
//! goes to stderr, because stdout carries minified code (single-file
//! mode) or the `--json` summary object.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber. `verbosity` is the count of `-v`
/// flags (0 = INFO, 1 = DEBUG, 2+ = TRACE); `RUST_LOG` supplies the
/// base filter and the flag-derived directives are layered on top.
///
/// # Panics
/// Panics if a subscriber is already installed.
pub fn init(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"))
        .add_directive(format!("squish={level}").parse().unwrap())
        .add_directive(level.into());

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
