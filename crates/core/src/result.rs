// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The result record envelope (spec §3, §6).
//!
//! A result record is conceptually a tagged union: either a normal
//! completion value or a serialized exception. The wire representation
//! uses the canonical keys `actor_result` / `actor_exception` so that
//! anything speaking the same envelope format (e.g. a dashboard reading
//! raw records out of the backend) can decode it without this crate.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A remote exception, carried as a closed `{type, mod, args}` triple
/// instead of dynamically reconstructed the way the dynamically typed
/// source does (see DESIGN.md OQ-3). `type_name` is the exception class
/// name; `module_name` is its defining module, when known; `args` are the
/// constructor arguments, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteException {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(rename = "mod", skip_serializing_if = "Option::is_none", default)]
    pub module_name: Option<String>,
    pub args: Vec<Value>,
}

impl RemoteException {
    pub fn new(type_name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            type_name: type_name.into(),
            module_name: None,
            args,
        }
    }

    pub fn with_module(mut self, module_name: impl Into<String>) -> Self {
        self.module_name = Some(module_name.into());
        self
    }
}

/// The envelope stored under a message fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultRecord {
    /// Normal completion.
    Result { actor_result: Value },
    /// Failure: the task raised.
    Exception { actor_exception: RemoteException },
}

impl ResultRecord {
    pub fn result(value: Value) -> Self {
        Self::Result { actor_result: value }
    }

    pub fn exception(exc: RemoteException) -> Self {
        Self::Exception { actor_exception: exc }
    }

    pub fn is_exception(&self) -> bool {
        matches!(self, Self::Exception { .. })
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
