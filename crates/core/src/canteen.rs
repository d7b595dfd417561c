// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The canteen: a fixed-capacity bulletin board used once during bootstrap
//! so the first worker to boot can publish the broker's fork-function list
//! back to the master (spec §4.D).
//!
//! The source implementation uses a `multiprocessing.Value`-backed shared
//! memory region. This workspace's workers are independent OS processes
//! rather than threads sharing an address space, so there is no portable
//! safe-Rust equivalent to a raw shared-memory region available here; per
//! DESIGN.md OQ-2 the canteen is instead realized as a small file plus an
//! `fs2` exclusive lock, giving the same cross-process mutual-exclusion and
//! first-writer-election contract without `unsafe`. Every worker still goes
//! through the same `publish_if_first` / `get` API the spec describes.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ForkPath;

/// Default capacity of the canteen payload, matching spec §3's "~64 KiB".
pub const DEFAULT_CAPACITY: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum CanteenError {
    #[error("canteen payload would exceed capacity ({0} bytes)")]
    CapacityExceeded(usize),
    #[error("canteen I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fixed-capacity, cross-process bulletin board of fork-function paths.
pub struct Canteen {
    path: PathBuf,
    lock_path: PathBuf,
    capacity: usize,
}

impl Canteen {
    /// `path` is where the published list is stored once initialized.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_capacity(path, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let lock_path = lock_path_for(&path);
        Self {
            path,
            lock_path,
            capacity,
        }
    }

    /// Whether some worker has already published the fork list.
    pub fn is_initialized(&self) -> bool {
        self.path.exists()
    }

    /// First-writer election: every worker calls this with the fork paths
    /// it discovered in its own broker's middleware. Only the first caller
    /// to win the lock while the canteen is still uninitialized writes
    /// anything; every other caller (including the winner's own repeated
    /// calls) is a no-op. Returns whether this call was the one that wrote.
    pub fn publish_if_first(&self, paths: &[ForkPath]) -> Result<bool, CanteenError> {
        if self.is_initialized() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)?;
        fs2::FileExt::lock_exclusive(&lock_file)?;

        // Re-check after acquiring the lock: another worker may have won
        // the race between our first check and taking the lock.
        if self.is_initialized() {
            let _ = fs2::FileExt::unlock(&lock_file);
            return Ok(false);
        }

        let payload_len: usize = paths.iter().map(|p| p.as_str().len() + 1).sum();
        if payload_len > self.capacity {
            let _ = fs2::FileExt::unlock(&lock_file);
            return Err(CanteenError::CapacityExceeded(payload_len));
        }

        // Write to a temp file and rename so `is_initialized()` never
        // observes a partially-written file.
        let tmp_path = self.path.with_extension("tmp");
        {
            let mut tmp = File::create(&tmp_path)?;
            for path in paths {
                writeln!(tmp, "{}", path.as_str())?;
            }
            tmp.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        let _ = fs2::FileExt::unlock(&lock_file);
        Ok(true)
    }

    /// The currently published fork paths, in insertion order. Empty if
    /// nothing has been published yet.
    pub fn get(&self) -> Result<Vec<ForkPath>, CanteenError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut paths = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if !line.is_empty() {
                paths.push(ForkPath::new(line));
            }
        }
        Ok(paths)
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    path.with_extension("lock")
}

#[cfg(test)]
#[path = "canteen_tests.rs"]
mod tests;
