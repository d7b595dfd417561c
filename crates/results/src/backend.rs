// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The result backend contract (spec §4.B).

use async_trait::async_trait;
use foreman_core::{MessageKey, RemoteException, ResultRecord};
use thiserror::Error;

/// Default wait when none is given: 10 seconds, matching the source's
/// `DEFAULT_TIMEOUT`.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Error)]
pub enum ResultError {
    #[error("no result stored for {0}")]
    ResultMissing(MessageKey),
    #[error("timed out waiting for a result for {0}")]
    ResultTimeout(MessageKey),
    #[error("no results available among {0} outstanding message(s)")]
    NoAnyResults(usize),
    #[error("exception reconstruction failed for type {type_name:?}: {reason}")]
    ReconstructionFailed { type_name: String, reason: String },
    #[error("backend storage error: {0}")]
    Storage(String),
}

/// What `get`/`get_any` hand back once a record decodes successfully.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A normal completion value.
    Value(serde_json::Value),
    /// A propagated exception, when `propagate = false` so the caller gets
    /// the reconstructed exception rather than an `Err`.
    Exception(RemoteException),
}

/// A value together with the fingerprint it was found under, as yielded by
/// `get_any` (spec's `with_task = true` variant).
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedOutcome {
    pub message_key: MessageKey,
    pub outcome: Outcome,
}

/// How `get`/`get_any` should behave when a record isn't there yet.
#[derive(Debug, Clone, Copy)]
pub struct GetOptions {
    pub block: bool,
    pub timeout_ms: u64,
    pub propagate: bool,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self {
            block: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            propagate: true,
        }
    }
}

/// Store and retrieve task results keyed by message fingerprint, with TTL
/// and blocking waits (spec §4.B).
///
/// `get`/`get_any` apply `propagate`: when `true` and the stored record is
/// an exception, implementations return `Err(ResultError::Storage(..))`
/// wrapping the reconstructed exception's description rather than handing
/// back a value — callers that want the exception object itself must pass
/// `propagate = false` and match on `Outcome::Exception`.
#[async_trait]
pub trait ResultBackend: Send + Sync {
    /// Derive the fingerprint a message's result is stored under. The
    /// default simply echoes `message_id`; backends that namespace keys
    /// (e.g. Redis, by prefix) override this instead of duplicating it at
    /// every call site.
    fn build_message_key(&self, message_id: &str) -> MessageKey {
        MessageKey::new(message_id)
    }

    async fn store(
        &self,
        key: &MessageKey,
        result: serde_json::Value,
        ttl_ms: u64,
    ) -> Result<(), ResultError>;

    async fn store_exception(
        &self,
        key: &MessageKey,
        exception: RemoteException,
        ttl_ms: u64,
    ) -> Result<(), ResultError>;

    async fn get(&self, key: &MessageKey, options: GetOptions) -> Result<Outcome, ResultError>;

    /// Returns outcomes in completion/arrival order as they become
    /// available, consuming `keys` as each resolves. Ordering matches the
    /// underlying store's arrival order, not the order `keys` was given in.
    async fn get_any(
        &self,
        keys: &[MessageKey],
        options: GetOptions,
    ) -> Result<Vec<TaggedOutcome>, ResultError>;
}

/// Turns a decoded [`ResultRecord`] into the [`Outcome`] `get`/`get_any`
/// report, applying the `propagate` flag. Shared by every backend so the
/// propagate/raise semantics stay identical across implementations.
pub(crate) fn apply_propagate(
    record: ResultRecord,
    propagate: bool,
) -> Result<Outcome, ResultError> {
    match record {
        ResultRecord::Result { actor_result } => Ok(Outcome::Value(actor_result)),
        ResultRecord::Exception { actor_exception } => {
            if propagate {
                Err(ResultError::Storage(format!(
                    "actor raised {}: {:?}",
                    actor_exception.type_name, actor_exception.args
                )))
            } else {
                Ok(Outcome::Exception(actor_exception))
            }
        }
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
