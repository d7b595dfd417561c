// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use tempfile::tempdir;

use super::*;

#[test]
fn claims_a_fresh_path_and_writes_own_pid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("foreman.pid");

    claim(&path).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.trim(), std::process::id().to_string());
}

#[test]
fn reclaiming_with_the_same_pid_succeeds() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("foreman.pid");

    claim(&path).unwrap();
    claim(&path).unwrap();
}

#[test]
fn garbage_contents_abort() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("foreman.pid");
    fs::write(&path, "not-a-pid").unwrap();

    assert!(matches!(claim(&path), Err(PidFileError::Garbage { .. })));
}

#[test]
fn a_pid_file_naming_a_dead_process_is_overwritten() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("foreman.pid");
    // PID 1 is init and will not be ours, but on a Linux CI sandbox it is
    // live; use a PID far outside any plausible range to get a "not live"
    // result on the Linux check path deterministically.
    fs::write(&path, "4999999").unwrap();

    if cfg!(target_os = "linux") {
        claim(&path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim(), std::process::id().to_string());
    }
}

#[test]
fn remove_is_best_effort_on_a_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nonexistent.pid");
    remove(&path); // must not panic
}

#[cfg(unix)]
#[test]
fn written_pid_file_has_0644_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let path = dir.path().join("foreman.pid");
    claim(&path).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}
