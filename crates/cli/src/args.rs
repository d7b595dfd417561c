// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The public CLI surface (spec §6). The hidden `--internal-worker` /
//! `--internal-fork` re-exec entrypoints never reach this parser — `main.rs`
//! intercepts them first, so they never appear in `--help` (DESIGN.md OQ-1).

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "foreman", version, about = "A distributed task-queue worker runtime")]
pub struct Cli {
    /// Broker reference: `module` (process-global default broker) or
    /// `module:dotted.attr` (resolved by successive attribute lookup).
    pub broker_ref: String,

    /// Additional modules every worker imports before it starts.
    pub modules: Vec<String>,

    /// Worker process count (default: CPU count).
    #[arg(short = 'p', long = "processes", value_name = "N")]
    pub processes: Option<usize>,

    /// Threads per worker process.
    #[arg(short = 't', long = "threads", value_name = "N", default_value_t = 8)]
    pub threads: usize,

    /// Prepended to the module import path (repeatable; defaults to ".").
    #[arg(short = 'P', long = "path", value_name = "PATH")]
    pub import_paths: Vec<PathBuf>,

    /// Restrict workers to these queues (repeatable; default: all queues).
    #[arg(short = 'Q', long = "queue", value_name = "QUEUE")]
    pub queues: Vec<String>,

    /// Write the master's PID to this file on startup.
    #[arg(long = "pid-file", value_name = "FILE")]
    pub pid_file: Option<PathBuf>,

    /// Send log output here instead of standard error.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force the spawn start method. Every worker here is already a fresh
    /// subprocess rather than a `fork()`'d one (DESIGN.md OQ-1), so this
    /// flag only round-trips for CLI compatibility.
    #[arg(long = "use-spawn")]
    pub use_spawn: bool,

    /// Launch an extra long-lived fork subprocess running `MOD:SYM`
    /// (repeatable).
    #[arg(short = 'f', long = "fork", value_name = "MOD:SYM")]
    pub forks: Vec<String>,

    /// Watch this directory for source changes and reload on modification.
    #[arg(long = "watch", value_name = "DIR")]
    pub watch: Option<PathBuf>,

    /// Use polling instead of OS filesystem events for `--watch`.
    #[arg(long = "watch-use-polling")]
    pub watch_use_polling: bool,

    /// Increase log verbosity (`-v` = INFO, `-vv` = DEBUG).
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
