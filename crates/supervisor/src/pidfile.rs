// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PID file semantics (spec §6): "contents = decimal PID ... permissions
//! `0644`. On startup: if the file exists and its PID refers to a
//! *different live process*, abort with code 4. If it refers to this same
//! PID (a re-exec after reload), proceed. If it contains non-numeric
//! garbage, abort. On exit, remove the PID file."
//!
//! Grounded on `daemon/src/lifecycle.rs::startup_inner`'s lock-file
//! handling: an `fs2` exclusive lock closes the race between two masters
//! starting at once, while the file's *contents* (rather than holding the
//! lock across the reload) are the authority spec §6 actually describes —
//! a re-exec'd master keeps its PID but gets a fresh file descriptor (exec
//! drops the old lock), so content inspection is what lets it recognize
//! "this is still me."

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PidFileError {
    #[error("pid file {path} contains non-numeric contents: {contents:?}")]
    Garbage { path: PathBuf, contents: String },
    #[error("pid file {path} names live process {pid}")]
    LiveConflict { path: PathBuf, pid: u32 },
    #[error("pid file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Claims `path` for the current process, per the spec's startup rule.
/// Returns `Ok(())` once the file contains this process's PID.
pub fn claim(path: &Path) -> Result<(), PidFileError> {
    let my_pid = std::process::id();

    if let Ok(contents) = fs::read_to_string(path) {
        let trimmed = contents.trim();
        if !trimmed.is_empty() {
            let existing_pid: u32 = trimmed.parse().map_err(|_| PidFileError::Garbage {
                path: path.to_path_buf(),
                contents: contents.clone(),
            })?;
            if existing_pid == my_pid {
                return Ok(()); // Re-exec after reload: same PID, nothing to do.
            }
            if is_live(existing_pid) {
                return Err(PidFileError::LiveConflict {
                    path: path.to_path_buf(),
                    pid: existing_pid,
                });
            }
            // Stale PID file from a crashed master: fall through and overwrite.
        }
    }

    write(path, my_pid)
}

fn write(path: &Path, pid: u32) -> Result<(), PidFileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).write(true).truncate(false).open(path)?;
    // Closes the race between two masters passing the liveness check at
    // the same instant; released automatically when `file` drops (and
    // again implicitly across `exec()` on reload, which is fine — the
    // content check above is what the *next* startup actually relies on).
    fs2::FileExt::try_lock_exclusive(&file).map_err(|_| PidFileError::LiveConflict {
        path: path.to_path_buf(),
        pid,
    })?;

    fs::write(path, pid.to_string())?;
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o644);
        fs::set_permissions(path, perms)?;
    }
    let _ = fs2::FileExt::unlock(&file);
    Ok(())
}

/// Removes the PID file on clean shutdown. Best-effort: a missing file is
/// not an error.
pub fn remove(path: &Path) {
    let _ = fs::remove_file(path);
}

/// Whether `pid` refers to a currently running process. Linux-only check
/// via `/proc/<pid>` existence (same platform constraint as
/// `foreman-middleware::rss`, DESIGN.md OQ-4) — no cross-platform
/// process-liveness crate is a teacher dependency. Off Linux this
/// conservatively reports "live" so startup aborts rather than silently
/// racing a process it can't actually observe.
#[cfg(target_os = "linux")]
fn is_live(pid: u32) -> bool {
    Path::new(&format!("/proc/{pid}")).exists()
}

#[cfg(not(target_os = "linux"))]
fn is_live(_pid: u32) -> bool {
    true
}

#[cfg(test)]
#[path = "pidfile_tests.rs"]
mod tests;
