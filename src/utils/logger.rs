// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tracing subscriber setup for the binaries

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "MESHKNIFE_LOG";

const DEFAULT_LEVEL: &str = "warn";

struct NoTime;

impl FormatTime for NoTime {
    fn format_time(&self, _: &mut Writer<'_>) -> std::fmt::Result {
        Ok(())
    }
}

/// Filter from `MESHKNIFE_LOG`, falling back to `warn` when unset or invalid
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Install a stderr subscriber without timestamps
///
/// `verbose` raises the default level to `debug` unless `MESHKNIFE_LOG` is
/// set. Calling this twice is harmless.
pub fn init_logging(verbose: bool) {
    let filter = if verbose && std::env::var_os(LOG_ENV).is_none() {
        EnvFilter::new("debug")
    } else {
        env_filter()
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(NoTime)
        .with_target(true)
        .with_filter(filter);

    let _ = tracing_subscriber::registry().with(layer).try_init();
}
