// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redis-backed result store (spec §4.B "Durable-store implementation").
//!
//! Grounded bit-for-bit on `dramatiq.results.backends.redis.RedisBackend`:
//! each fingerprint maps to a single-element Redis list. Writes are
//! `DEL` + `LPUSH` + `PEXPIRE` in one pipeline so no partial record is ever
//! visible; blocking reads use `BRPOPLPUSH key key timeout` (pop right,
//! push back left, so the record survives the read); non-blocking reads use
//! `LINDEX key 0`. Redis timeouts are whole seconds, so millisecond
//! timeouts are truncated toward zero, same as the source's
//! `timeout = int(timeout / 1000)`; a sub-second request truncates to `0`
//! and falls through to the immediate non-blocking `rpoplpush` below.

use async_trait::async_trait;
use foreman_core::{Clock, MessageKey, RemoteException, ResultRecord, SystemClock};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::backend::{
    apply_propagate, GetOptions, Outcome, ResultBackend, ResultError, TaggedOutcome,
    DEFAULT_TIMEOUT_MS,
};
use crate::encoder::{Encoder, JsonEncoder};

/// Default key prefix, matching the source's `"dramatiq-results"`.
pub const DEFAULT_NAMESPACE: &str = "foreman-results";

#[derive(Clone)]
pub struct RedisResultBackend {
    namespace: String,
    conn: ConnectionManager,
    encoder: JsonEncoder,
}

impl RedisResultBackend {
    /// Connects using a `redis://` URL, matching the source's `url=`
    /// constructor parameter.
    pub async fn connect(url: &str) -> Result<Self, ResultError> {
        Self::connect_with_namespace(url, DEFAULT_NAMESPACE).await
    }

    pub async fn connect_with_namespace(url: &str, namespace: &str) -> Result<Self, ResultError> {
        let client =
            redis::Client::open(url).map_err(|e| ResultError::Storage(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| ResultError::Storage(e.to_string()))?;
        Ok(Self {
            namespace: namespace.to_string(),
            conn,
            encoder: JsonEncoder,
        })
    }

    fn namespaced_key(&self, key: &MessageKey) -> String {
        format!("{}:{}", self.namespace, key.as_str())
    }

    /// Redis timeouts are whole seconds; truncated toward zero like the
    /// source, so a sub-second request (e.g. 250ms) comes out as `0` and
    /// the caller takes the non-blocking `rpoplpush` path instead of
    /// blocking for a full second.
    fn timeout_seconds(timeout_ms: u64) -> i64 {
        (timeout_ms / 1000) as i64
    }

    async fn store_record(
        &self,
        key: &MessageKey,
        record: ResultRecord,
        ttl_ms: u64,
    ) -> Result<(), ResultError> {
        let redis_key = self.namespaced_key(key);
        let payload = self
            .encoder
            .encode(&record)
            .map_err(|e| ResultError::Storage(e.to_string()))?;

        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .del(&redis_key)
            .lpush(&redis_key, payload)
            .pexpire(&redis_key, ttl_ms as i64)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| ResultError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn read_record(
        &self,
        key: &MessageKey,
        options: GetOptions,
    ) -> Result<Option<Vec<u8>>, ResultError> {
        let redis_key = self.namespaced_key(key);
        let mut conn = self.conn.clone();

        if options.block {
            let timeout_s = Self::timeout_seconds(options.timeout_ms);
            if timeout_s == 0 {
                let value: Option<Vec<u8>> = conn
                    .rpoplpush(&redis_key, &redis_key)
                    .await
                    .map_err(|e| ResultError::Storage(e.to_string()))?;
                Ok(value)
            } else {
                let value: Option<Vec<u8>> = conn
                    .brpoplpush(&redis_key, &redis_key, timeout_s as usize)
                    .await
                    .map_err(|e| ResultError::Storage(e.to_string()))?;
                Ok(value)
            }
        } else {
            conn.lindex(&redis_key, 0)
                .await
                .map_err(|e| ResultError::Storage(e.to_string()))
        }
    }

    fn decode(&self, payload: &[u8]) -> Result<ResultRecord, ResultError> {
        self.encoder
            .decode(payload)
            .map_err(|e| ResultError::Storage(e.to_string()))
    }
}

#[async_trait]
impl ResultBackend for RedisResultBackend {
    fn build_message_key(&self, message_id: &str) -> MessageKey {
        MessageKey::new(message_id)
    }

    async fn store(
        &self,
        key: &MessageKey,
        result: serde_json::Value,
        ttl_ms: u64,
    ) -> Result<(), ResultError> {
        self.store_record(key, ResultRecord::result(result), ttl_ms)
            .await
    }

    async fn store_exception(
        &self,
        key: &MessageKey,
        exception: RemoteException,
        ttl_ms: u64,
    ) -> Result<(), ResultError> {
        self.store_record(key, ResultRecord::exception(exception), ttl_ms)
            .await
    }

    async fn get(&self, key: &MessageKey, options: GetOptions) -> Result<Outcome, ResultError> {
        let payload = self.read_record(key, options).await?;
        match payload {
            Some(bytes) => apply_propagate(self.decode(&bytes)?, options.propagate),
            None if options.block => Err(ResultError::ResultTimeout(key.clone())),
            None => Err(ResultError::ResultMissing(key.clone())),
        }
    }

    /// Mirrors the source's `get_any_results` loop: a multi-key blocking
    /// right-pop, pushing each popped payload back onto its own key before
    /// decoding, so a concurrent reader can still observe it later.
    async fn get_any(
        &self,
        keys: &[MessageKey],
        options: GetOptions,
    ) -> Result<Vec<TaggedOutcome>, ResultError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut outstanding: std::collections::HashMap<String, MessageKey> = keys
            .iter()
            .map(|k| (self.namespaced_key(k), k.clone()))
            .collect();
        let mut out = Vec::with_capacity(keys.len());
        let clock = SystemClock;
        let deadline = clock.now()
            + std::time::Duration::from_millis(if options.block {
                options.timeout_ms
            } else {
                DEFAULT_TIMEOUT_MS
            });

        while !outstanding.is_empty() {
            let redis_keys: Vec<String> = outstanding.keys().cloned().collect();
            let per_call_timeout = if options.block {
                let remaining = deadline.saturating_duration_since(clock.now());
                (remaining.as_secs().max(1)) as usize
            } else {
                1
            };

            let mut conn = self.conn.clone();
            let found: Option<(String, Vec<u8>)> = conn
                .brpop(redis_keys, per_call_timeout as f64)
                .await
                .map_err(|e| ResultError::Storage(e.to_string()))?;

            let Some((found_key, payload)) = found else {
                return if options.block {
                    Err(ResultError::ResultTimeout(MessageKey::new("get_any")))
                } else {
                    Err(ResultError::NoAnyResults(outstanding.len()))
                };
            };

            // Put it back so later readers (direct `get`, or another
            // `get_any`) still observe the record.
            let mut conn = self.conn.clone();
            let _: () = conn
                .lpush(&found_key, payload.clone())
                .await
                .map_err(|e| ResultError::Storage(e.to_string()))?;

            let message_key = match outstanding.remove(&found_key) {
                Some(k) => k,
                None => continue,
            };
            let record = self.decode(&payload)?;
            let outcome = apply_propagate(record, options.propagate)?;
            out.push(TaggedOutcome {
                message_key,
                outcome,
            });

            if !options.block && clock.now() >= deadline && !outstanding.is_empty() {
                return Err(ResultError::ResultTimeout(MessageKey::new("get_any")));
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
#[path = "redis_backend_tests.rs"]
mod tests;
