// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fork subprocess entrypoint (spec §4.F): simpler than the worker
//! entrypoint, since a fork has no broker and no thread pool — it runs a
//! single registered function once and exits with whatever that function
//! returns.

use foreman_core::ExitCode;
use tracing::{error, warn};

use crate::registry::ProcRegistry;
use crate::signal::{Escalation, SignalDiscipline};

/// Runs the fork function registered under `fork_ref` (a `module:symbol`
/// name, spec §6's `-f MOD:SYM`) to completion and maps its return value to
/// a process exit status. The function itself is synchronous (spec: "the
/// function's return value is the process exit code") so it's run on a
/// blocking thread while this task watches for a second terminate signal.
pub async fn run_fork(fork_ref: &str, registry: &ProcRegistry) -> ExitCode {
    let func = match registry.resolve_fork(fork_ref) {
        Ok(func) => func,
        Err(err) => {
            error!(fork_ref, %err, "no such fork function registered");
            return ExitCode::Import;
        }
    };

    let discipline = SignalDiscipline::new();
    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(err) => {
            error!(%err, "failed to install terminate handler");
            return ExitCode::Import;
        }
    };
    // Ignore interrupt, same as the worker entrypoint: a terminal Ctrl-C
    // hits this process directly alongside everything else in the
    // foreground group.
    let mut sigint = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt()) {
        Ok(stream) => stream,
        Err(err) => {
            error!(%err, "failed to install interrupt handler");
            return ExitCode::Import;
        }
    };

    let handle = tokio::task::spawn_blocking(move || func());

    tokio::pin!(handle);
    loop {
        tokio::select! {
            result = &mut handle => {
                return match result {
                    Ok(code) => ExitCode::from_code(code).unwrap_or(ExitCode::Ok),
                    Err(err) => {
                        error!(%err, "fork function panicked");
                        ExitCode::Import
                    }
                };
            }
            _ = sigterm.recv() => {
                if discipline.deliver_terminate() == Escalation::HardKill {
                    warn!(fork_ref, "second terminate signal, hard-killing");
                    return ExitCode::Killed;
                }
            }
            _ = sigint.recv() => {}
        }
    }
}

#[cfg(test)]
#[path = "fork_tests.rs"]
mod tests;
