// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Master's own tracing setup. Grounded on
//! `daemon/src/main.rs::setup_logging`: a non-blocking file appender when
//! `--log-file` is given, standard error otherwise, with verbosity
//! controlled by `-v`/`-vv` (spec §6) or `RUST_LOG` when set.

use std::path::Path;

use thiserror::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to prepare log directory: {0}")]
    Io(#[from] std::io::Error),
}

/// How noisy the master's own tracing output should be, independent of the
/// log multiplexer (which relays subprocess output verbatim, unfiltered).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Warn,
    Info,
    Debug,
}

impl Verbosity {
    fn as_filter(self) -> &'static str {
        match self {
            Verbosity::Warn => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
        }
    }
}

/// Installs the global tracing subscriber. Must be called at most once per
/// process. Returns the appender guard; dropping it flushes the file
/// writer, so the caller must keep it alive for the process lifetime.
pub fn setup(
    log_file: Option<&Path>,
    verbosity: Verbosity,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.as_filter()));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("foreman.log"));
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(non_blocking))
                .init();
            Ok(guard)
        }
        None => {
            let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(non_blocking))
                .init();
            Ok(guard)
        }
    }
}
