// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn null_broker_publishes_no_fork_paths() {
    let broker = NullBroker;
    assert!(broker.fork_paths().is_empty());
}

#[tokio::test]
async fn null_broker_lifecycle_hooks_are_infallible() {
    let broker = NullBroker;
    broker.emit_after(BrokerEvent::ProcessBoot).await.unwrap();
    broker.emit_after(BrokerEvent::ProcessStop).await.unwrap();
    broker.close().await.unwrap();
}
