// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawns worker and fork subprocesses as fresh invocations of the current
//! binary (DESIGN.md OQ-1), piping their stdout/stderr so the master can
//! drain them through the log multiplexer. Grounded on
//! `adapters/src/session/tmux.rs`'s `tokio::process::Command` usage,
//! pointed at `std::env::current_exe()` instead of an external program.

use std::path::PathBuf;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::{Child, Command};

use crate::config::SupervisorConfig;

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("could not resolve the current executable: {0}")]
    CurrentExe(std::io::Error),
    #[error("failed to spawn subprocess: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Internal CLI subcommand names the `foreman` binary dispatches on when
/// re-exec'd as a worker or fork subprocess. Deliberately absent from the
/// public `--help` text (DESIGN.md OQ-1).
pub const INTERNAL_WORKER_FLAG: &str = "--internal-worker";
pub const INTERNAL_FORK_FLAG: &str = "--internal-fork";

/// Builds the argv for worker slot `index`, re-exec'ing the current binary.
pub fn worker_argv(config: &SupervisorConfig, index: usize) -> Vec<String> {
    let mut argv = vec![
        INTERNAL_WORKER_FLAG.to_string(),
        "--index".to_string(),
        index.to_string(),
        "--broker-ref".to_string(),
        config.broker_ref.clone(),
        "--threads".to_string(),
        config.threads.to_string(),
    ];
    for module in &config.user_modules {
        argv.push("--module".to_string());
        argv.push(module.clone());
    }
    for queue in &config.queues {
        argv.push("--queue".to_string());
        argv.push(queue.clone());
    }
    for path in &config.import_paths {
        argv.push("--path".to_string());
        argv.push(path.display().to_string());
    }
    argv
}

/// Builds the argv for a fork subprocess running `fork_ref`.
pub fn fork_argv(fork_ref: &str) -> Vec<String> {
    vec![INTERNAL_FORK_FLAG.to_string(), "--fork-ref".to_string(), fork_ref.to_string()]
}

/// Spawns a child re-exec'ing the current binary with `argv`, piping its
/// stdout and stderr so the caller can register them with the log
/// multiplexer.
pub fn spawn_self(argv: &[String]) -> Result<Child, SpawnError> {
    let exe = current_exe()?;
    Command::new(exe)
        .args(argv)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(false)
        .spawn()
        .map_err(SpawnError::Spawn)
}

fn current_exe() -> Result<PathBuf, SpawnError> {
    std::env::current_exe().map_err(SpawnError::CurrentExe)
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
