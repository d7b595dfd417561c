// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker boundary (spec GLOSSARY "Worker"): "in-process thread pool
//! that pulls messages from a broker; exposes `start`, `stop`, and a
//! read-only `restart_requested` flag." Actual task dispatch is a
//! non-goal; this is the narrow contract the worker entrypoint drives.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use foreman_middleware::RestartPolicy;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerPoolError {
    #[error("worker pool failed to start: {0}")]
    StartFailed(String),
    #[error("worker pool failed to stop: {0}")]
    StopFailed(String),
}

#[async_trait]
pub trait WorkerPool: Send + Sync {
    async fn start(&self) -> Result<(), WorkerPoolError>;
    async fn stop(&self) -> Result<(), WorkerPoolError>;
    fn restart_requested(&self) -> bool;
}

/// An in-process worker pool double: no real threads, no real broker I/O.
/// `process_one` simulates one message completing, running it through the
/// attached [`RestartPolicy`] the way a real pool's after-process-message
/// hook would. Used to drive the worker entrypoint (and restart-cap
/// scenarios like spec §8's S2) end-to-end in tests.
pub struct SimWorkerPool {
    policy: Arc<dyn RestartPolicy>,
    started: AtomicBool,
    restart_requested: AtomicBool,
    processed: AtomicUsize,
}

impl SimWorkerPool {
    pub fn new(policy: Arc<dyn RestartPolicy>) -> Self {
        Self {
            policy,
            started: AtomicBool::new(false),
            restart_requested: AtomicBool::new(false),
            processed: AtomicUsize::new(0),
        }
    }

    /// Simulates completing one message. Returns whether this call tripped
    /// the restart policy.
    pub fn process_one(&self) -> bool {
        self.processed.fetch_add(1, Ordering::SeqCst);
        if self.policy.after_process_message().is_some() {
            self.restart_requested.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::SeqCst)
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkerPool for SimWorkerPool {
    async fn start(&self) -> Result<(), WorkerPoolError> {
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<(), WorkerPoolError> {
        self.started.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn restart_requested(&self) -> bool {
        self.restart_requested.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "worker_pool_tests.rs"]
mod tests;
