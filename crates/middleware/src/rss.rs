// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resident-set-size sampling for the memory restart policy.
//!
//! The source samples RSS via `psutil`, which shells out to platform APIs
//! on the caller's behalf. This workspace's dependency stack carries no
//! cross-platform process-metrics crate (see DESIGN.md OQ-4), so sampling
//! is implemented directly against `/proc/self/statm` on Linux, the
//! simplest reliable source for a process's own RSS, and a fixed `0` stub
//! everywhere else — which never trips a restart, but keeps the policy
//! usable (just memory-cap-inert) off Linux.

/// Current process resident set size, in bytes.
pub trait RssSampler: Send + Sync {
    fn rss_bytes(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRssSampler;

impl RssSampler for SystemRssSampler {
    #[cfg(target_os = "linux")]
    fn rss_bytes(&self) -> u64 {
        linux_rss_bytes().unwrap_or(0)
    }

    #[cfg(not(target_os = "linux"))]
    fn rss_bytes(&self) -> u64 {
        0
    }
}

// The workspace forbids unsafe code, which rules out an FFI `sysconf`
// call; every current Linux target (x86_64, aarch64) uses a 4 KiB page,
// so this is assumed rather than queried.
#[cfg(target_os = "linux")]
const ASSUMED_PAGE_SIZE_BYTES: u64 = 4096;

#[cfg(target_os = "linux")]
fn linux_rss_bytes() -> Option<u64> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    // statm fields: size resident shared text lib data dt, in pages.
    let resident_pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    Some(resident_pages * ASSUMED_PAGE_SIZE_BYTES)
}

#[cfg(test)]
#[path = "rss_tests.rs"]
mod tests;
