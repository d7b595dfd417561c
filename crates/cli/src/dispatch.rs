// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routes parsed argv into the master supervisor's run loop or a re-exec'd
//! worker/fork subprocess's entrypoint. `main.rs` decides *which* of these
//! three to call by sniffing the hidden internal flags before any parser
//! runs; this module is only responsible for what happens after that.

use std::sync::Arc;

use clap::Parser;
use foreman_core::{Canteen, ExitCode};
use foreman_middleware::{RestartPolicy, TaskCountPolicy};
use foreman_proc::{run_fork, run_worker, RegistryError, SimWorkerPool, WorkerConfig, WorkerPool};
use foreman_supervisor::{ForkSpec, SupervisorConfig, Verbosity};
use tracing::error;

use crate::args::Cli;
use crate::internal_args::{InternalForkArgs, InternalWorkerArgs};
use crate::registry::build_default_registry;

/// Restart cap the CLI's built-in demo worker pool uses. A real deployment
/// configures this through its own broker middleware (spec §4.C), not a
/// CLI flag — `broker_ref`/`-f` resolution in this binary only reaches the
/// demo registry (see `crate::registry`).
const DEFAULT_MAX_TASKS_PER_CHILD: u64 = 1000;

pub async fn run_master(argv: &[String]) -> ExitCode {
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { ExitCode::Import } else { ExitCode::Ok };
        }
    };

    let verbosity = match cli.verbose {
        0 => Verbosity::Warn,
        1 => Verbosity::Info,
        _ => Verbosity::Debug,
    };
    let _guard = match foreman_supervisor::setup_logging(cli.log_file.as_deref(), verbosity) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("failed to initialize logging: {err}");
            return ExitCode::Import;
        }
    };

    foreman_supervisor::run(build_supervisor_config(cli)).await
}

fn build_supervisor_config(cli: Cli) -> SupervisorConfig {
    let mut config = SupervisorConfig::new(cli.broker_ref);
    config.user_modules = cli.modules;
    if let Some(processes) = cli.processes {
        config.processes = processes;
    }
    config.threads = cli.threads;
    if !cli.import_paths.is_empty() {
        config.import_paths = cli.import_paths;
    }
    config.queues = cli.queues;
    config.pid_file = cli.pid_file;
    config.log_file = cli.log_file;
    config.use_spawn = cli.use_spawn;
    config.extra_forks = cli.forks.into_iter().map(|fork_ref| ForkSpec { fork_ref }).collect();
    config.watch_dir = cli.watch;
    config.watch_use_polling = cli.watch_use_polling;
    config
}

/// Entrypoint for a worker subprocess (spec §4.E), reached only after
/// `main.rs` spots `--internal-worker` in its own argv and re-execs past
/// the public parser entirely.
pub async fn run_internal_worker(argv: &[String]) -> ExitCode {
    let args = match parse_internal::<InternalWorkerArgs>(argv) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::Import;
        }
    };

    init_subprocess_logging();

    let registry = build_default_registry();
    let canteen = Canteen::new(foreman_supervisor::default_state_dir().join("canteen"));

    let broker = match registry.resolve_broker(&args.broker_ref) {
        Ok(broker) => broker,
        Err(RegistryError::BrokerFactoryFailed(name, reason)) => {
            error!(broker_ref = %name, %reason, "broker connect failed");
            return ExitCode::Connect;
        }
        Err(_) => {
            error!(broker_ref = %args.broker_ref, "no such broker registered");
            return ExitCode::Import;
        }
    };
    let fork_paths = broker.fork_paths();

    let policy: Arc<dyn RestartPolicy> = Arc::new(TaskCountPolicy::new(DEFAULT_MAX_TASKS_PER_CHILD));
    let pool: Arc<dyn WorkerPool> = Arc::new(SimWorkerPool::new(policy));

    let config = WorkerConfig {
        index: args.index,
        broker_ref: args.broker_ref,
        user_modules: args.modules,
        fork_paths,
    };

    run_worker(config, &registry, &canteen, pool, tokio::io::stdout()).await
}

/// Entrypoint for a fork subprocess (spec §4.F), reached only after
/// `main.rs` spots `--internal-fork`.
pub async fn run_internal_fork(argv: &[String]) -> ExitCode {
    let args = match parse_internal::<InternalForkArgs>(argv) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::Import;
        }
    };

    init_subprocess_logging();

    let registry = build_default_registry();
    run_fork(&args.fork_ref, &registry).await
}

fn parse_internal<T: Parser>(argv: &[String]) -> Result<T, clap::Error> {
    T::try_parse_from(std::iter::once("foreman".to_string()).chain(argv.iter().cloned()))
}

fn init_subprocess_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
