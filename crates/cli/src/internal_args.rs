// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Argument shapes for the hidden `--internal-worker` / `--internal-fork`
//! re-exec entrypoints built by
//! `foreman_supervisor::spawn::{worker_argv, fork_argv}`. `main.rs` parses
//! these directly, bypassing [`crate::args::Cli`] entirely, so neither
//! flag nor any of these sub-flags ever appears in `--help` (DESIGN.md
//! OQ-1).

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "foreman --internal-worker", disable_help_flag = true, disable_version_flag = true)]
pub struct InternalWorkerArgs {
    #[arg(long)]
    pub index: usize,
    #[arg(long = "broker-ref")]
    pub broker_ref: String,
    #[arg(long, default_value_t = 8)]
    pub threads: usize,
    #[arg(long = "module")]
    pub modules: Vec<String>,
    #[arg(long = "queue")]
    pub queues: Vec<String>,
    #[arg(long = "path")]
    pub paths: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(name = "foreman --internal-fork", disable_help_flag = true, disable_version_flag = true)]
pub struct InternalForkArgs {
    #[arg(long = "fork-ref")]
    pub fork_ref: String,
}

#[cfg(test)]
#[path = "internal_args_tests.rs"]
mod tests;
