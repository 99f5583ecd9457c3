//! Tracing subscriber bootstrap.

use std::str::FromStr;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global subscriber. `level` is a bare level ("debug") or a full
/// filter directive ("info,trip_solver::solver=debug"). Returns false when a
/// subscriber was already installed, which is not an error.
pub fn init_logging(level: &str, json_format: bool) -> bool {
    let filter = EnvFilter::from_str(level.trim()).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if json_format {
        registry
            .with(fmt::layer().json().with_target(false).with_current_span(false))
            .try_init()
            .is_ok()
    } else {
        registry
            .with(fmt::layer().with_target(true).compact())
            .try_init()
            .is_ok()
    };
    if installed {
        tracing::info!(
            level = level.trim(),
            format = if json_format { "json" } else { "compact" },
            "logging initialized"
        );
    }
    installed
}
