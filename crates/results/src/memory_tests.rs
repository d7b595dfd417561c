// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use foreman_core::FakeClock;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn store_then_get_round_trips_a_value() {
    let backend = MemoryResultBackend::new();
    let key = MessageKey::new("msg-1");
    backend.store(&key, json!({"n": 1}), 10_000).await.unwrap();

    let outcome = backend.get(&key, GetOptions::default()).await.unwrap();
    assert_eq!(outcome, Outcome::Value(json!({"n": 1})));
}

#[tokio::test]
async fn get_on_missing_key_returns_result_missing() {
    let backend = MemoryResultBackend::new();
    let key = MessageKey::new("nope");

    let err = backend.get(&key, GetOptions::default()).await.unwrap_err();
    assert!(matches!(err, ResultError::ResultMissing(_)));
}

#[tokio::test]
async fn expired_entry_is_treated_as_missing() {
    let clock = FakeClock::new();
    let backend = MemoryResultBackend::with_clock(clock.clone());
    let key = MessageKey::new("msg-1");
    backend.store(&key, json!(1), 1_000).await.unwrap();

    clock.advance(Duration::from_millis(1_001));

    let err = backend.get(&key, GetOptions::default()).await.unwrap_err();
    assert!(matches!(err, ResultError::ResultMissing(_)));
}

#[tokio::test]
async fn store_exception_propagates_as_error_by_default() {
    let backend = MemoryResultBackend::new();
    let key = MessageKey::new("msg-1");
    let exc = RemoteException::new("ValueError", vec![json!("bad")]);
    backend.store_exception(&key, exc, 10_000).await.unwrap();

    let err = backend.get(&key, GetOptions::default()).await.unwrap_err();
    assert!(matches!(err, ResultError::Storage(_)));
}

#[tokio::test]
async fn store_exception_with_propagate_false_returns_exception_outcome() {
    let backend = MemoryResultBackend::new();
    let key = MessageKey::new("msg-1");
    let exc = RemoteException::new("ValueError", vec![json!("bad")]);
    backend.store_exception(&key, exc.clone(), 10_000).await.unwrap();

    let options = GetOptions {
        propagate: false,
        ..GetOptions::default()
    };
    let outcome = backend.get(&key, options).await.unwrap();
    assert_eq!(outcome, Outcome::Exception(exc));
}

#[tokio::test]
async fn get_any_collects_every_stored_key() {
    let backend = MemoryResultBackend::new();
    let a = MessageKey::new("a");
    let b = MessageKey::new("b");
    backend.store(&a, json!(1), 10_000).await.unwrap();
    backend.store(&b, json!(2), 10_000).await.unwrap();

    let results = backend
        .get_any(&[a.clone(), b.clone()], GetOptions::default())
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().any(|r| r.message_key == a));
    assert!(results.iter().any(|r| r.message_key == b));
}

#[tokio::test]
async fn get_any_on_nothing_stored_returns_no_any_results() {
    let backend = MemoryResultBackend::new();
    let keys = [MessageKey::new("a"), MessageKey::new("b")];

    let err = backend
        .get_any(&keys, GetOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ResultError::NoAnyResults(2)));
}

#[tokio::test]
async fn store_overwrites_prior_record_for_the_same_key() {
    let backend = MemoryResultBackend::new();
    let key = MessageKey::new("msg-1");
    backend.store(&key, json!(1), 10_000).await.unwrap();
    backend.store(&key, json!(2), 10_000).await.unwrap();

    let outcome = backend.get(&key, GetOptions::default()).await.unwrap();
    assert_eq!(outcome, Outcome::Value(json!(2)));
}
