// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use foreman_core::ExitCode;
use serial_test::serial;
use tempfile::tempdir;

use super::{run_internal_fork, run_internal_worker, run_master};

#[tokio::test]
async fn master_reports_import_error_on_missing_broker_ref() {
    // `foreman` with no broker_ref is a clap usage error (spec §6: "invalid
    // CLI" -> exit 2); clap prints its own message and this function maps
    // that to a process exit rather than panicking.
    let exit = run_master(&["foreman".to_string()]).await;
    assert_eq!(exit, ExitCode::Import);
}

#[tokio::test]
async fn master_exits_cleanly_on_version_flag() {
    let exit = run_master(&["foreman".to_string(), "--version".to_string()]).await;
    assert_eq!(exit, ExitCode::Ok);
}

#[tokio::test]
#[serial]
async fn internal_worker_against_the_null_broker_stays_up_until_signaled() {
    // The null broker never trips a restart, so the worker loop only exits
    // on a terminate/hangup signal or the task being dropped — proving it
    // reached the supervision loop (rather than erroring out immediately)
    // is as far as a signal-free test can safely go.
    let dir = tempdir().unwrap();
    std::env::set_var(foreman_supervisor::STATE_DIR_ENV_VAR, dir.path());

    let result = tokio::time::timeout(
        Duration::from_millis(50),
        run_internal_worker(&[
            "--index".to_string(),
            "0".to_string(),
            "--broker-ref".to_string(),
            "null".to_string(),
            "--threads".to_string(),
            "8".to_string(),
        ]),
    )
    .await;

    std::env::remove_var(foreman_supervisor::STATE_DIR_ENV_VAR);
    assert!(result.is_err(), "worker should still be in its supervision loop");
}

#[tokio::test]
async fn internal_worker_reports_import_error_for_an_unregistered_broker() {
    let exit = run_internal_worker(&[
        "--index".to_string(),
        "0".to_string(),
        "--broker-ref".to_string(),
        "myapp:broker".to_string(),
        "--threads".to_string(),
        "8".to_string(),
    ])
    .await;
    assert_eq!(exit, ExitCode::Import);
}

#[tokio::test]
async fn internal_fork_runs_the_registered_null_function() {
    let exit = run_internal_fork(&["--fork-ref".to_string(), "null:noop".to_string()]).await;
    assert_eq!(exit, ExitCode::Ok);
}

#[tokio::test]
async fn internal_fork_reports_import_error_for_an_unregistered_target() {
    let exit = run_internal_fork(&["--fork-ref".to_string(), "myapp:report_fork".to_string()]).await;
    assert_eq!(exit, ExitCode::Import);
}
