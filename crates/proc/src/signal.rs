// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! First-terminate-soft-stop, second-terminate-hard-kill discipline, shared
//! by the worker entrypoint (spec §4.E step 7) and the fork entrypoint
//! (spec §4.F): "ignore interrupt; install a handler for terminate (and
//! reload-equivalents) that sets a `running` flag to false on first
//! delivery and force-exits with `RET_KILLED` on second."

use std::sync::atomic::{AtomicBool, Ordering};

/// What to do with a just-delivered terminate-class signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// First delivery: stop accepting new work, finish shutting down
    /// cleanly.
    SoftStop,
    /// Second delivery: exit immediately with `ExitCode::Killed`.
    HardKill,
}

/// Tracks whether a subprocess is still `running` and how many
/// terminate-class signals it has seen.
#[derive(Debug, Default)]
pub struct SignalDiscipline {
    running: AtomicBool,
    terminate_delivered: AtomicBool,
}

impl SignalDiscipline {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
            terminate_delivered: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Record delivery of a terminate-class signal (terminate, hangup, or
    /// any other reload-equivalent). Interrupt alone is never passed here —
    /// spec §4.E says to ignore it outright at the subprocess level.
    pub fn deliver_terminate(&self) -> Escalation {
        if self.terminate_delivered.swap(true, Ordering::SeqCst) {
            Escalation::HardKill
        } else {
            self.running.store(false, Ordering::SeqCst);
            Escalation::SoftStop
        }
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
