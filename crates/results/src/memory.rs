// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory result backend (spec §4.B "In-memory implementation (stub)").
//!
//! A process-shared table of `fingerprint -> (record, expiry)`. Intended
//! for tests and the single-process worker simulation; never durable
//! across restarts.

use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use foreman_core::{Clock, MessageKey, RemoteException, ResultRecord, SystemClock};
use parking_lot::Mutex;

use crate::backend::{apply_propagate, GetOptions, Outcome, ResultBackend, ResultError, TaggedOutcome};

struct Entry {
    record: ResultRecord,
    expires_at: Instant,
}

/// In-memory, single-process result backend. Construction is cheap and
/// cloning shares the same table, mirroring the Redis backend's client
/// sharing semantics.
#[derive(Clone)]
pub struct MemoryResultBackend<C: Clock = SystemClock> {
    table: std::sync::Arc<Mutex<HashMap<MessageKey, Entry>>>,
    clock: C,
}

impl Default for MemoryResultBackend<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryResultBackend<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> MemoryResultBackend<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            table: std::sync::Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    fn insert(&self, key: &MessageKey, record: ResultRecord, ttl_ms: u64) {
        let expires_at = self.clock.now() + std::time::Duration::from_millis(ttl_ms);
        self.table
            .lock()
            .insert(key.clone(), Entry { record, expires_at });
    }

    fn read(&self, key: &MessageKey) -> Option<ResultRecord> {
        let mut table = self.table.lock();
        let now = self.clock.now();
        match table.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.record.clone()),
            Some(_) => {
                table.remove(key);
                None
            }
            None => None,
        }
    }
}

#[async_trait]
impl<C: Clock> ResultBackend for MemoryResultBackend<C> {
    async fn store(
        &self,
        key: &MessageKey,
        result: serde_json::Value,
        ttl_ms: u64,
    ) -> Result<(), ResultError> {
        self.insert(key, ResultRecord::result(result), ttl_ms);
        Ok(())
    }

    async fn store_exception(
        &self,
        key: &MessageKey,
        exception: RemoteException,
        ttl_ms: u64,
    ) -> Result<(), ResultError> {
        self.insert(key, ResultRecord::exception(exception), ttl_ms);
        Ok(())
    }

    async fn get(&self, key: &MessageKey, options: GetOptions) -> Result<Outcome, ResultError> {
        // Blocking waits make no sense for a single-process stub that never
        // receives a record from anywhere but this same process; the spec
        // scopes this backend to tests, where the record is always written
        // before it's read, so we simply check once either way.
        let _ = options.block;
        match self.read(key) {
            Some(record) => apply_propagate(record, options.propagate),
            None => Err(ResultError::ResultMissing(key.clone())),
        }
    }

    async fn get_any(
        &self,
        keys: &[MessageKey],
        options: GetOptions,
    ) -> Result<Vec<TaggedOutcome>, ResultError> {
        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(record) = self.read(key) {
                let outcome = apply_propagate(record, options.propagate)?;
                out.push(TaggedOutcome {
                    message_key: key.clone(),
                    outcome,
                });
            }
        }
        if out.is_empty() && !keys.is_empty() {
            return Err(ResultError::NoAnyResults(keys.len()));
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
