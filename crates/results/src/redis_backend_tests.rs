// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn timeout_seconds_truncates_toward_zero() {
    assert_eq!(RedisResultBackend::timeout_seconds(0), 0);
    assert_eq!(RedisResultBackend::timeout_seconds(250), 0);
    assert_eq!(RedisResultBackend::timeout_seconds(999), 0);
    assert_eq!(RedisResultBackend::timeout_seconds(1_000), 1);
    assert_eq!(RedisResultBackend::timeout_seconds(1_001), 1);
    assert_eq!(RedisResultBackend::timeout_seconds(1_500), 1);
}

// Everything else in this module talks to a real Redis server and is
// exercised in the workspace's external-service integration suite, not
// here, matching how the source's own Redis backend tests require a
// running Redis instance rather than mocking the wire protocol.
#[tokio::test]
#[ignore = "requires a reachable Redis instance; set FOREMAN_TEST_REDIS_URL"]
async fn store_then_get_round_trips_against_a_real_redis() {
    let url = std::env::var("FOREMAN_TEST_REDIS_URL")
        .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let backend = RedisResultBackend::connect_with_namespace(&url, "foreman-results-test")
        .await
        .unwrap();
    let key = MessageKey::new("integration-test-key");

    backend
        .store(&key, serde_json::json!({"ok": true}), 10_000)
        .await
        .unwrap();

    let outcome = backend.get(&key, GetOptions::default()).await.unwrap();
    assert_eq!(outcome, Outcome::Value(serde_json::json!({"ok": true})));
}
