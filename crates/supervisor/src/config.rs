// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Master supervisor configuration: the CLI crate parses `--`-flags into
//! one of these and hands it to [`crate::run`]. Grounded on
//! `daemon/src/lifecycle.rs::Config`'s shape (a plain struct of resolved
//! paths plus a `load()` that applies the state-dir env-var override).

use std::env;
use std::path::PathBuf;

/// Environment variable that overrides the default state directory (PID
/// file, canteen file) when `--pid-file` isn't given explicitly. Mirrors
/// the teacher's `OJ_STATE_DIR`-style override in `daemon/src/env.rs`.
pub const STATE_DIR_ENV_VAR: &str = "FOREMAN_STATE_DIR";

/// The state directory a master (and its re-exec'd children, which inherit
/// its environment) computes when `--pid-file` doesn't pin a location
/// explicitly. Exposed so the CLI's internal worker/fork entrypoints can
/// derive the same canteen path without the supervisor passing it over
/// argv.
pub fn default_state_dir() -> PathBuf {
    if let Ok(dir) = env::var(STATE_DIR_ENV_VAR) {
        return PathBuf::from(dir);
    }
    env::temp_dir().join("foreman")
}

/// A `-f MOD:SYM` long-lived fork subprocess declared on the command line
/// (spec §6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkSpec {
    pub fork_ref: String,
}

/// Fully resolved master configuration (spec §6's CLI surface).
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// `broker_ref` argument: `module` or `module:dotted.attr` (resolved by
    /// the worker/fork subprocess's own `ProcRegistry`, not here).
    pub broker_ref: String,
    /// Additional user modules to load in each worker (spec §4.E step 4).
    pub user_modules: Vec<String>,
    /// `-p N`: worker process count, default = CPU count.
    pub processes: usize,
    /// `-t N`: threads per worker process, default = 8.
    pub threads: usize,
    /// `-P PATH`: prepended to the module import path.
    pub import_paths: Vec<PathBuf>,
    /// `-Q QUEUE`: restrict to these queues; empty = all queues.
    pub queues: Vec<String>,
    /// `--pid-file FILE`.
    pub pid_file: Option<PathBuf>,
    /// `--log-file FILE`; `None` means log to standard error.
    pub log_file: Option<PathBuf>,
    /// `--use-spawn`: force the spawn start method. Ambient in this
    /// workspace (every child is already a freshly spawned process, spec
    /// DESIGN.md OQ-1), kept only so the flag round-trips.
    pub use_spawn: bool,
    /// `-f MOD:SYM`: extra long-lived fork subprocesses.
    pub extra_forks: Vec<ForkSpec>,
    /// `--watch DIR`.
    pub watch_dir: Option<PathBuf>,
    /// `--watch-use-polling`.
    pub watch_use_polling: bool,
    /// Directory holding the canteen file when no explicit path is given.
    pub state_dir: PathBuf,
}

impl SupervisorConfig {
    /// A config with every optional field at its documented default,
    /// requiring only the mandatory `broker_ref`. Callers (the CLI crate)
    /// override fields from parsed arguments.
    pub fn new(broker_ref: impl Into<String>) -> Self {
        Self {
            broker_ref: broker_ref.into(),
            user_modules: Vec::new(),
            processes: num_cpus(),
            threads: 8,
            import_paths: vec![PathBuf::from(".")],
            queues: Vec::new(),
            pid_file: None,
            log_file: None,
            use_spawn: false,
            extra_forks: Vec::new(),
            watch_dir: None,
            watch_use_polling: false,
            state_dir: default_state_dir(),
        }
    }

    pub fn canteen_path(&self) -> PathBuf {
        self.state_dir.join("canteen")
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
