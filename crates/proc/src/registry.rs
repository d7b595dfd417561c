// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Closed substitute for the source's dynamic `module[:attr]` import (spec
//! §4.E step 3, §4.F, §6's `broker_ref`/`-f MOD:SYM` syntax). The embedding
//! application registers its broker factories and fork functions by name
//! ahead of time; the worker and fork entrypoints look them up by the same
//! strings the CLI accepts on the command line.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::broker::Broker;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no broker registered under {0:?}")]
    UnknownBroker(String),
    #[error("no fork function registered under {0:?}")]
    UnknownFork(String),
    #[error("broker factory {0:?} failed: {1}")]
    BrokerFactoryFailed(String, String),
}

/// Builds a [`Broker`] on demand. Fallible because connecting may fail
/// (spec §4.E: "broker connect failure -> `RET_CONNECT`").
pub type BrokerFactory = Arc<dyn Fn() -> Result<Arc<dyn Broker>, String> + Send + Sync>;

/// A fork subprocess's entrypoint (spec §4.F): "the function's return value
/// is the process exit code."
pub type ForkFn = Arc<dyn Fn() -> i32 + Send + Sync>;

/// The closed table of names this binary knows how to resolve. Populated
/// once at startup by whatever links `foreman-proc` in; entries are not
/// added dynamically afterward.
#[derive(Clone, Default)]
pub struct ProcRegistry {
    brokers: HashMap<String, BrokerFactory>,
    forks: HashMap<String, ForkFn>,
}

impl ProcRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_broker(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> Result<Arc<dyn Broker>, String> + Send + Sync + 'static,
    ) {
        self.brokers.insert(name.into(), Arc::new(factory));
    }

    pub fn register_fork(&mut self, name: impl Into<String>, func: impl Fn() -> i32 + Send + Sync + 'static) {
        self.forks.insert(name.into(), Arc::new(func));
    }

    pub fn resolve_broker(&self, name: &str) -> Result<Arc<dyn Broker>, RegistryError> {
        let factory = self
            .brokers
            .get(name)
            .ok_or_else(|| RegistryError::UnknownBroker(name.to_string()))?;
        factory()
            .map_err(|reason| RegistryError::BrokerFactoryFailed(name.to_string(), reason))
    }

    pub fn resolve_fork(&self, name: &str) -> Result<ForkFn, RegistryError> {
        self.forks
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownFork(name.to_string()))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
