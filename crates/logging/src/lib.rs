#![warn(missing_docs)]

//! Shared logging helpers and CLI argument definitions for the overlay workspace.
//!
//! Binaries flatten [`LogArgs`] into their clap parser and call [`init`].
//! The level flags only touch workspace crates, so `--debug` does not turn on
//! tokio's internals; `--log-filter` takes a raw directive for anything else.

use std::{env, io};

use clap::Args;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

/// Environment variable consulted when no flag picks a filter.
pub const RUST_LOG_ENV: &str = "RUST_LOG";

/// Level applied to our crates when nothing else is configured.
pub const DEFAULT_LEVEL: &str = "info";

/// Workspace crate targets whose logs the level flags control. Third-party
/// targets (tokio, etc.) stay at the subscriber default.
const OUR_CRATES: &[&str] = &[
    "overlayctl",
    "overlay_server",
    "overlay_engine",
    "overlay_winops",
    "overlay_protocol",
    "permissions",
    "config",
    "logging",
];

/// Log flags shared by overlay binaries.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Trace-level logs for workspace crates
    #[arg(long, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Debug-level logs for workspace crates
    #[arg(long, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// One level for all workspace crates (error|warn|info|debug|trace)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Raw tracing filter directive, e.g. "overlay_engine=trace,overlay_server=debug"
    #[arg(long, value_name = "DIRECTIVE")]
    pub log_filter: Option<String>,
}

impl LogArgs {
    /// Filter directive for these flags.
    pub fn spec(&self) -> String {
        compute_spec(
            self.trace,
            self.debug,
            self.log_level.as_deref(),
            self.log_filter.as_deref(),
        )
    }
}

/// Targets the level flags apply to.
pub fn our_crates() -> &'static [&'static str] {
    OUR_CRATES
}

/// Directive setting `level` on every workspace crate, e.g.
/// `overlayctl=debug,overlay_server=debug,...`.
pub fn level_spec_for(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    let mut spec = String::new();
    for target in OUR_CRATES {
        if !spec.is_empty() {
            spec.push(',');
        }
        spec.push_str(target);
        spec.push('=');
        spec.push_str(&level);
    }
    spec
}

/// Resolve the filter directive. First match wins:
/// an explicit filter, then `trace`, `debug` or `log_level` scoped to our
/// crates, then a non-empty `RUST_LOG`, then [`DEFAULT_LEVEL`] for our crates.
pub fn compute_spec(
    trace: bool,
    debug: bool,
    log_level: Option<&str>,
    log_filter: Option<&str>,
) -> String {
    if let Some(filter) = log_filter {
        return filter.to_string();
    }
    let level = if trace {
        Some("trace")
    } else if debug {
        Some("debug")
    } else {
        log_level
    };
    match level {
        Some(level) => level_spec_for(level),
        None => env::var(RUST_LOG_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| level_spec_for(DEFAULT_LEVEL)),
    }
}

/// Parse a directive into an [`EnvFilter`].
pub fn env_filter_from_spec(spec: &str) -> EnvFilter {
    EnvFilter::new(spec)
}

/// Install the stderr subscriber used by overlay binaries. Stdout stays free
/// for command output. A second call is a no-op.
pub fn init(args: &LogArgs) {
    let installed = registry()
        .with(env_filter_from_spec(&args.spec()))
        .with(fmt::layer().with_writer(io::stderr).without_time())
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
