// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The broker/worker-pool boundary (spec §1, GLOSSARY "Broker"/"Worker").
//!
//! Actor dispatch and the wire protocol to a real task queue are explicit
//! non-goals (spec §1's scope table). What the master and worker
//! entrypoints actually need from a broker is narrow: the fork paths its
//! middleware declares, a hook to announce lifecycle events, and a way to
//! close it down cleanly. That's the whole surface captured here.

use async_trait::async_trait;
use foreman_core::ForkPath;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("failed to connect to broker: {0}")]
    ConnectFailed(String),
    #[error("broker close failed: {0}")]
    CloseFailed(String),
}

/// A lifecycle event a worker announces to its broker (spec §4.E step 3:
/// "emit a `process_boot` event on it").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerEvent {
    ProcessBoot,
    ProcessStop,
}

/// The narrow slice of "external task queue backend" (GLOSSARY) that this
/// workspace's supervision machinery depends on.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Fork-function paths declared by this broker's middleware stack, as
    /// published through the canteen (spec §4.D).
    fn fork_paths(&self) -> Vec<ForkPath>;

    async fn emit_after(&self, event: BrokerEvent) -> Result<(), BrokerError>;

    async fn close(&self) -> Result<(), BrokerError>;
}

/// A broker with no fork targets and no-op lifecycle hooks. Used by the
/// fork subprocess entrypoint (which never touches a broker) and by tests
/// that only need the worker entrypoint's *shape* exercised end-to-end.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBroker;

#[async_trait]
impl Broker for NullBroker {
    fn fork_paths(&self) -> Vec<ForkPath> {
        Vec::new()
    }

    async fn emit_after(&self, _event: BrokerEvent) -> Result<(), BrokerError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), BrokerError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "broker_tests.rs"]
mod tests;
