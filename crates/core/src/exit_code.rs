// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The exit codes the master process and its subprocesses return.
//!
//! See spec §6 "Exit codes". `RestartRequested` (253) is an in-band signal
//! from a worker subprocess asking the master to respawn its slot; the
//! master must never propagate it as its own exit status.

/// Process exit status, shared by the master supervisor and the worker /
/// fork subprocess entrypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Clean shutdown.
    Ok = 0,
    /// Killed: second-signal escalation after a soft-stop request.
    Killed = 1,
    /// Module import failed, or invalid CLI arguments.
    Import = 2,
    /// Broker connection failed at worker startup.
    Connect = 3,
    /// PID file conflict or write failure.
    PidFile = 4,
    /// Internal: a worker requests a restart. Never returned by the master.
    RestartRequested = 253,
}

impl ExitCode {
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Reconstructs an `ExitCode` from a raw process exit status, if it
    /// matches one of the known codes.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            1 => Some(Self::Killed),
            2 => Some(Self::Import),
            3 => Some(Self::Connect),
            4 => Some(Self::PidFile),
            253 => Some(Self::RestartRequested),
            _ => None,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.code()
    }
}

#[cfg(test)]
#[path = "exit_code_tests.rs"]
mod tests;
