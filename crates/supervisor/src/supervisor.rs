// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The master supervisor (spec §4.G): startup ordering, signal broadcast,
//! the supervision loop, and reload-via-re-exec shutdown.
//!
//! Grounded on `daemon/src/main.rs`'s `tokio::select!` engine loop and
//! signal-handler installation, generalized from one long-lived daemon
//! process to one that spawns, supervises, and restarts a pool of
//! subprocesses.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use foreman_core::{Canteen, ExitCode};
use tokio::process::Child;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::SupervisorConfig;
use crate::pidfile;
use crate::spawn::{self, SpawnError};
use foreman_proc::{run_log_mux_dynamic, LogSource};

const CANTEEN_GRACE_PERIOD: Duration = Duration::from_millis(500);
const SUPERVISE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Runs the master supervisor to completion, implementing spec §4.G's
/// startup ordering, supervision loop, and shutdown sequence. Returns the
/// process exit code the `foreman` binary should report (unless a reload
/// was requested, in which case this function re-execs and never returns
/// on success).
pub async fn run(config: SupervisorConfig) -> ExitCode {
    if let Some(pid_file) = &config.pid_file {
        if let Err(err) = pidfile::claim(pid_file) {
            error!(%err, "pid file claim failed");
            return ExitCode::PidFile;
        }
    }

    let canteen = Canteen::new(config.canteen_path());

    let (log_tx, log_rx) = mpsc::unbounded_channel::<LogSource>();
    let mux_handle = spawn_log_mux(config.log_file.clone(), log_rx);

    let mut slots: HashMap<usize, Child> = HashMap::new();
    for index in 0..config.processes {
        match spawn_worker_slot(&config, index, &log_tx) {
            Ok(child) => {
                slots.insert(index, child);
            }
            Err(err) => {
                error!(%err, index, "failed to spawn worker");
                shut_down_on_startup_failure(&config, slots, Vec::new(), log_tx, mux_handle).await;
                return ExitCode::Import;
            }
        }
    }

    wait_for_canteen(&canteen, CANTEEN_GRACE_PERIOD).await;

    let fork_refs: Vec<String> = config
        .extra_forks
        .iter()
        .map(|f| f.fork_ref.clone())
        .chain(
            canteen
                .get()
                .unwrap_or_default()
                .into_iter()
                .map(|path| path.as_str().to_string()),
        )
        .collect();

    let mut fork_children: Vec<Child> = Vec::new();
    for fork_ref in &fork_refs {
        match spawn_fork_slot(fork_ref, &log_tx) {
            Ok(child) => fork_children.push(child),
            Err(err) => warn!(%err, fork_ref, "failed to spawn fork subprocess"),
        }
    }

    let running = Arc::new(AtomicBool::new(true));
    let reload = Arc::new(AtomicBool::new(false));

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(err) => {
            error!(%err, "failed to install terminate handler");
            return ExitCode::Import;
        }
    };
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(s) => s,
        Err(err) => {
            error!(%err, "failed to install interrupt handler");
            return ExitCode::Import;
        }
    };
    let mut sighup = match signal(SignalKind::hangup()) {
        Ok(s) => s,
        Err(err) => {
            error!(%err, "failed to install hangup handler");
            return ExitCode::Import;
        }
    };

    let mut overall_exit = ExitCode::Ok;

    loop {
        if slots.is_empty() {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(SUPERVISE_POLL_INTERVAL) => {
                reap_exited_workers(&config, &mut slots, &log_tx, &running, &fork_children, &mut overall_exit).await;
            }
            _ = sigterm.recv() => {
                info!("terminate received, broadcasting to children");
                running.store(false, Ordering::SeqCst);
                broadcast_terminate(&slots, &fork_children).await;
            }
            _ = sigint.recv() => {
                info!("interrupt received, upgrading to terminate");
                running.store(false, Ordering::SeqCst);
                broadcast_terminate(&slots, &fork_children).await;
            }
            _ = sighup.recv() => {
                info!("hangup received, requesting reload after shutdown");
                reload.store(true, Ordering::SeqCst);
                running.store(false, Ordering::SeqCst);
                broadcast_terminate(&slots, &fork_children).await;
            }
        }
    }

    for child in fork_children.iter_mut() {
        let _ = child.kill().await;
    }
    drop(log_tx);
    let _ = mux_handle.await;

    if let Some(pid_file) = &config.pid_file {
        pidfile::remove(pid_file);
    }

    if reload.load(Ordering::SeqCst) {
        let err = reexec();
        error!(%err, "re-exec failed");
        return ExitCode::Import;
    }

    overall_exit
}

async fn reap_exited_workers(
    config: &SupervisorConfig,
    slots: &mut HashMap<usize, Child>,
    log_tx: &mpsc::UnboundedSender<LogSource>,
    running: &Arc<AtomicBool>,
    fork_children: &[Child],
    overall_exit: &mut ExitCode,
) {
    let indices: Vec<usize> = slots.keys().copied().collect();
    for index in indices {
        let status = {
            let Some(child) = slots.get_mut(&index) else {
                continue;
            };
            child.try_wait()
        };

        match status {
            Ok(None) => {}
            Ok(Some(status)) => {
                slots.remove(&index);
                let code = status.code().and_then(ExitCode::from_code).unwrap_or(ExitCode::Ok);

                if code == ExitCode::RestartRequested && running.load(Ordering::SeqCst) {
                    info!(index, "worker requested restart, respawning slot");
                    match spawn_worker_slot(config, index, log_tx) {
                        Ok(child) => {
                            slots.insert(index, child);
                        }
                        Err(err) => error!(%err, index, "failed to respawn worker"),
                    }
                } else if running.load(Ordering::SeqCst) {
                    error!(index, ?code, "worker exited unexpectedly, shutting down");
                    running.store(false, Ordering::SeqCst);
                    *overall_exit = code;
                    broadcast_terminate(slots, fork_children).await;
                } else {
                    *overall_exit = max_exit(*overall_exit, code);
                }
            }
            Err(err) => warn!(%err, index, "error polling worker status"),
        }
    }
}

fn spawn_log_mux(
    log_file: Option<std::path::PathBuf>,
    log_rx: mpsc::UnboundedReceiver<LogSource>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match log_file {
            Some(path) => match tokio::fs::OpenOptions::new().create(true).append(true).open(&path).await {
                Ok(file) => {
                    if let Err(err) = run_log_mux_dynamic(Vec::new(), log_rx, file).await {
                        error!(%err, "log multiplexer exited with an error");
                    }
                }
                Err(err) => error!(%err, path = %path.display(), "failed to open log file"),
            },
            None => {
                if let Err(err) = run_log_mux_dynamic(Vec::new(), log_rx, tokio::io::stderr()).await {
                    error!(%err, "log multiplexer exited with an error");
                }
            }
        }
    })
}

fn spawn_worker_slot(
    config: &SupervisorConfig,
    index: usize,
    log_tx: &mpsc::UnboundedSender<LogSource>,
) -> Result<Child, SpawnError> {
    let argv = spawn::worker_argv(config, index);
    let mut child = spawn::spawn_self(&argv)?;
    register_pipes(&mut child, &format!("worker-{index}"), log_tx);
    Ok(child)
}

fn spawn_fork_slot(fork_ref: &str, log_tx: &mpsc::UnboundedSender<LogSource>) -> Result<Child, SpawnError> {
    let argv = spawn::fork_argv(fork_ref);
    let mut child = spawn::spawn_self(&argv)?;
    register_pipes(&mut child, &format!("fork:{fork_ref}"), log_tx);
    Ok(child)
}

fn register_pipes(child: &mut Child, label: &str, log_tx: &mpsc::UnboundedSender<LogSource>) {
    if let Some(stdout) = child.stdout.take() {
        let _ = log_tx.send(LogSource::new(format!("{label}:stdout"), stdout));
    }
    if let Some(stderr) = child.stderr.take() {
        let _ = log_tx.send(LogSource::new(format!("{label}:stderr"), stderr));
    }
}

async fn wait_for_canteen(canteen: &Canteen, timeout: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;
    while !canteen.is_initialized() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

/// Best-effort broadcast of a terminate signal to every live child PID
/// (spec §4.G: "ignore per-PID failures unless the child is still
/// running"). Shells out to `kill`, mirroring the teacher's
/// external-process-as-control-plane pattern in
/// `adapters/src/session/tmux.rs` — there is no safe-Rust, dependency-free
/// way to signal an arbitrary PID without `unsafe` FFI, which this
/// workspace forbids.
async fn broadcast_terminate(slots: &HashMap<usize, Child>, forks: &[Child]) {
    for child in slots.values().chain(forks.iter()) {
        if let Some(pid) = child.id() {
            let _ = tokio::process::Command::new("kill")
                .arg("-TERM")
                .arg(pid.to_string())
                .status()
                .await;
        }
    }
}

async fn shut_down_on_startup_failure(
    config: &SupervisorConfig,
    slots: HashMap<usize, Child>,
    fork_children: Vec<Child>,
    log_tx: mpsc::UnboundedSender<LogSource>,
    mux_handle: tokio::task::JoinHandle<()>,
) {
    broadcast_terminate(&slots, &fork_children).await;
    drop(slots);
    drop(fork_children);
    drop(log_tx);
    let _ = mux_handle.await;
    if let Some(pid_file) = &config.pid_file {
        pidfile::remove(pid_file);
    }
}

fn max_exit(a: ExitCode, b: ExitCode) -> ExitCode {
    if b.code() > a.code() {
        b
    } else {
        a
    }
}

/// Re-execs the current binary in place with its original argv (spec
/// §4.G's reload shutdown step). Returns only on failure — a successful
/// `exec` replaces this process image and never returns.
#[cfg(unix)]
fn reexec() -> std::io::Error {
    use std::os::unix::process::CommandExt;

    let exe = std::env::current_exe().unwrap_or_else(|_| std::path::PathBuf::from("foreman"));
    let args: Vec<std::ffi::OsString> = std::env::args_os().skip(1).collect();
    std::process::Command::new(exe).args(args).exec()
}

#[cfg(not(unix))]
fn reexec() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Unsupported, "re-exec is only implemented on unix")
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
