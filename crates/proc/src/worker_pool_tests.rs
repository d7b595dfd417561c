// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use foreman_middleware::TaskCountPolicy;

use super::*;

#[tokio::test]
async fn start_and_stop_flip_the_started_flag() {
    let pool = SimWorkerPool::new(Arc::new(TaskCountPolicy::new(0)));
    assert!(!pool.is_started());
    pool.start().await.unwrap();
    assert!(pool.is_started());
    pool.stop().await.unwrap();
    assert!(!pool.is_started());
}

#[test]
fn process_one_counts_messages() {
    let pool = SimWorkerPool::new(Arc::new(TaskCountPolicy::new(0)));
    pool.process_one();
    pool.process_one();
    assert_eq!(pool.processed(), 2);
}

#[test]
fn restart_requested_flips_once_cap_is_reached() {
    let pool = SimWorkerPool::new(Arc::new(TaskCountPolicy::new(3)));
    assert!(!pool.restart_requested());
    assert!(!pool.process_one());
    assert!(!pool.process_one());
    assert!(pool.process_one());
    assert!(pool.restart_requested());
}

#[test]
fn zero_cap_never_requests_a_restart() {
    let pool = SimWorkerPool::new(Arc::new(TaskCountPolicy::new(0)));
    for _ in 0..50 {
        pool.process_one();
    }
    assert!(!pool.restart_requested());
}
