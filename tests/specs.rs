// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box behavioral specs for the `foreman` binary (spec §6): exercise
//! the compiled CLI surface the way an operator would, rather than calling
//! into `foreman-cli`'s internals directly.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use assert_cmd::Command;
use serial_test::serial;
use tempfile::tempdir;

/// Resolves the `foreman` binary built alongside this integration test.
/// `assert_cmd::Command::cargo_bin` only finds binaries built by the *same*
/// package as the test; `foreman` lives in a different workspace member, so
/// this resolves it from the shared `target/debug` directory instead
/// (grounded on `oj`'s own `tests/specs/prelude.rs::binary_path`).
fn binary_path() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let standard = manifest_dir.join("target/debug/foreman");
    if standard.exists() {
        return standard;
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join("foreman");
            if fallback.exists() {
                return fallback;
            }
        }
    }
    standard
}

fn foreman() -> Command {
    Command::new(binary_path())
}

#[test]
fn no_args_is_a_usage_error_exiting_2() {
    foreman().assert().failure().code(2);
}

#[test]
fn version_flag_prints_version_and_exits_0() {
    let output = foreman().arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unregistered_broker_ref_fails_fast() {
    // `myapp:broker` isn't in this binary's built-in demo registry
    // (DESIGN.md OQ-5), so the master starts one worker, which exits 2
    // immediately; the master then reports that same exit code.
    let dir = tempdir().unwrap();
    foreman()
        .env("FOREMAN_STATE_DIR", dir.path())
        .args(["myapp:broker", "-p", "1"])
        .timeout(Duration::from_secs(10))
        .assert()
        .code(2);
}

#[test]
#[serial]
fn conflicting_live_pid_file_aborts_with_4() {
    let dir = tempdir().unwrap();
    let pid_file = dir.path().join("foreman.pid");
    // Our own test process is a live PID distinct from any worker this
    // invocation would spawn.
    std::fs::write(&pid_file, std::process::id().to_string()).unwrap();

    foreman()
        .env("FOREMAN_STATE_DIR", dir.path())
        .args(["null", "--pid-file", pid_file.to_str().unwrap(), "-p", "1"])
        .timeout(Duration::from_secs(10))
        .assert()
        .code(4);
}

#[test]
fn garbage_pid_file_aborts_with_4() {
    let dir = tempdir().unwrap();
    let pid_file = dir.path().join("foreman.pid");
    std::fs::write(&pid_file, "not-a-pid").unwrap();

    foreman()
        .env("FOREMAN_STATE_DIR", dir.path())
        .args(["null", "--pid-file", pid_file.to_str().unwrap(), "-p", "1"])
        .timeout(Duration::from_secs(10))
        .assert()
        .code(4);
}
