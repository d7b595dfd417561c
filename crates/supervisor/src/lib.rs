// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The master supervisor: process spawning, PID file lifecycle,
//! configuration, logging setup, and the top-level supervision loop that
//! the `foreman` binary drives.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod logging;
pub mod pidfile;
pub mod spawn;
mod supervisor;

pub use config::{default_state_dir, ForkSpec, SupervisorConfig, STATE_DIR_ENV_VAR};
pub use logging::{setup as setup_logging, LoggingError, Verbosity};
pub use pidfile::PidFileError;
pub use spawn::{SpawnError, INTERNAL_FORK_FLAG, INTERNAL_WORKER_FLAG};
pub use supervisor::run;
