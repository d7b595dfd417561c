// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds the [`ProcRegistry`] this binary resolves `broker_ref` and
//! `-f MOD:SYM` names against.
//!
//! Actor dispatch and the broker wire protocol are explicit non-goals
//! (spec §1): nothing in this workspace can actually connect to a real
//! task queue. What's registered here is the "null" stand-in demonstrating
//! the wiring end-to-end (`foreman_proc::NullBroker`, a no-op fork), the
//! same role `StubBroker` plays in the original. A real deployment embeds
//! its own broker factories and fork functions by building a binary that
//! links `foreman-proc` directly and populates its own [`ProcRegistry`]
//! instead of calling this function — there is no dynamic `module:attr`
//! loading path for Rust to hook into (DESIGN.md OQ-5).

use std::sync::Arc;

use foreman_proc::{Broker, NullBroker, ProcRegistry};

/// Name `broker_ref` / `-f` resolve the built-in demo entries under.
pub const NULL_BROKER_NAME: &str = "null";
pub const NULL_FORK_NAME: &str = "null:noop";

pub fn build_default_registry() -> ProcRegistry {
    let mut registry = ProcRegistry::new();
    registry.register_broker(NULL_BROKER_NAME, || Ok(Arc::new(NullBroker) as Arc<dyn Broker>));
    registry.register_fork(NULL_FORK_NAME, || 0);
    registry
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
