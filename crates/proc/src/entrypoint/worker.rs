// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker subprocess entrypoint (spec §4.E). Run by `foreman`'s hidden
//! `--internal-worker` subcommand after it re-execs itself (see
//! `foreman-proc`'s crate docs and DESIGN.md OQ-1): this is what the child
//! process actually does once it's running.

use std::sync::Arc;
use std::time::Duration;

use foreman_core::{Canteen, CanteenError, ExitCode, ForkPath};
use tokio::io::AsyncWrite;
use tracing::{error, info, warn};

use crate::broker::BrokerEvent;
use crate::registry::{ProcRegistry, RegistryError};
use crate::signal::{Escalation, SignalDiscipline};
use crate::worker_pool::WorkerPool;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Everything a worker subprocess needs to run the spec §4.E sequence.
/// `user_modules` has no dynamic-import equivalent in Rust (see DESIGN.md
/// OQ-5) — entries are only logged, since loading them is the embedding
/// binary's job at link time, not this function's.
pub struct WorkerConfig {
    pub index: usize,
    pub broker_ref: String,
    pub user_modules: Vec<String>,
    pub fork_paths: Vec<ForkPath>,
}

/// Runs one worker subprocess to completion and returns the exit code the
/// process should report. `pool` must already be wired to `broker_ref`'s
/// broker and the configured `RestartPolicy`; this function drives its
/// lifecycle rather than constructing it, so tests can substitute a
/// [`crate::worker_pool::SimWorkerPool`].
pub async fn run_worker<W>(
    config: WorkerConfig,
    registry: &ProcRegistry,
    canteen: &Canteen,
    pool: Arc<dyn WorkerPool>,
    mut log_pipe: W,
) -> ExitCode
where
    W: AsyncWrite + Unpin,
{
    let _ = &mut log_pipe; // stdout/stderr redirection is the CLI launcher's job (step 2); kept for signature symmetry.

    // Step 1: re-seed so sibling workers diverge. `rand::rng()` already
    // reseeds per-thread from OS entropy on first use; touching it here
    // just forces that to happen at a known point rather than lazily on
    // first actor dispatch.
    let _: u64 = rand::random();

    let broker = match registry.resolve_broker(&config.broker_ref) {
        Ok(broker) => broker,
        Err(RegistryError::BrokerFactoryFailed(name, reason)) => {
            error!(broker_ref = %name, %reason, "broker connect failed");
            return ExitCode::Connect;
        }
        Err(_) => {
            error!(broker_ref = %config.broker_ref, "no such broker registered");
            return ExitCode::Import;
        }
    };

    if let Err(err) = broker.emit_after(BrokerEvent::ProcessBoot).await {
        error!(%err, "broker refused process_boot event");
        return ExitCode::Connect;
    }

    for module in &config.user_modules {
        info!(module, "user module linked in");
    }

    if !canteen.is_initialized() {
        if let Err(err) = publish_fork_paths(canteen, &config.fork_paths) {
            error!(%err, "failed publishing fork paths to canteen");
            return ExitCode::Import;
        }
    }

    if let Err(err) = pool.start().await {
        error!(%err, "worker pool failed to start");
        return ExitCode::Connect;
    }

    let discipline = SignalDiscipline::new();
    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(err) => {
            error!(%err, "failed to install terminate handler");
            return ExitCode::Import;
        }
    };
    let mut sighup = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup()) {
        Ok(stream) => stream,
        Err(err) => {
            error!(%err, "failed to install hangup handler");
            return ExitCode::Import;
        }
    };
    // Step 7: ignore interrupt outright. A terminal Ctrl-C delivers SIGINT
    // to the whole foreground process group, including this worker
    // directly; without a handler it would die on its default disposition
    // instead of waiting for the master's terminate broadcast.
    let mut sigint = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt()) {
        Ok(stream) => stream,
        Err(err) => {
            error!(%err, "failed to install interrupt handler");
            return ExitCode::Import;
        }
    };

    loop {
        if !discipline.is_running() || pool.restart_requested() {
            break;
        }
        tokio::select! {
            _ = sigterm.recv() => {
                if discipline.deliver_terminate() == Escalation::HardKill {
                    warn!(worker = config.index, "second terminate signal, hard-killing");
                    return ExitCode::Killed;
                }
            }
            _ = sighup.recv() => {
                if discipline.deliver_terminate() == Escalation::HardKill {
                    warn!(worker = config.index, "second hangup signal, hard-killing");
                    return ExitCode::Killed;
                }
            }
            _ = sigint.recv() => {}
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
        }
    }

    if let Err(err) = pool.stop().await {
        error!(%err, "worker pool failed to stop cleanly");
    }
    if let Err(err) = broker.emit_after(BrokerEvent::ProcessStop).await {
        warn!(%err, "broker rejected process_stop event");
    }
    if let Err(err) = broker.close().await {
        warn!(%err, "broker close failed");
    }

    if pool.restart_requested() {
        ExitCode::RestartRequested
    } else {
        ExitCode::Ok
    }
}

fn publish_fork_paths(canteen: &Canteen, fork_paths: &[ForkPath]) -> Result<bool, CanteenError> {
    canteen.publish_if_first(fork_paths)
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
