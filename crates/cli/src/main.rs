// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! foreman - a distributed task-queue worker runtime.
//!
//! The same binary plays three roles, distinguished by argv before any
//! `clap` parser runs: the master supervisor (the public surface, spec
//! §6), a worker subprocess (`--internal-worker`, spec §4.E), and a fork
//! subprocess (`--internal-fork`, spec §4.F). The latter two are re-exec
//! targets the master spawns (DESIGN.md OQ-1) rather than anything a user
//! invokes directly, so they're intercepted ahead of the public `Cli`
//! parser and never show up in `--help`.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod args;
mod dispatch;
mod internal_args;
mod registry;

use foreman_supervisor::{INTERNAL_FORK_FLAG, INTERNAL_WORKER_FLAG};

#[tokio::main]
async fn main() {
    let argv: Vec<String> = std::env::args().collect();

    let exit = match argv.get(1).map(String::as_str) {
        Some(flag) if flag == INTERNAL_WORKER_FLAG => dispatch::run_internal_worker(&argv[2..]).await,
        Some(flag) if flag == INTERNAL_FORK_FLAG => dispatch::run_internal_fork(&argv[2..]).await,
        _ => dispatch::run_master(&argv).await,
    };

    std::process::exit(exit.code());
}
