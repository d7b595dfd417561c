// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn does_not_signal_before_the_cap_is_reached() {
    let policy = TaskCountPolicy::new(3);
    assert_eq!(policy.after_process_message(), None);
    assert_eq!(policy.after_process_message(), None);
}

#[test]
fn signals_exactly_on_the_nth_call() {
    let policy = TaskCountPolicy::new(3);
    policy.after_process_message();
    policy.after_process_message();
    assert_eq!(policy.after_process_message(), Some(RestartWorker));
}

#[test]
fn continues_to_signal_after_the_cap() {
    let policy = TaskCountPolicy::new(1);
    assert_eq!(policy.after_process_message(), Some(RestartWorker));
    assert_eq!(policy.after_process_message(), Some(RestartWorker));
}

#[test]
fn zero_cap_means_no_limit() {
    let policy = TaskCountPolicy::new(0);
    for _ in 0..100 {
        assert_eq!(policy.after_process_message(), None);
    }
}

#[parameterized(
    one = { 1, 1 },
    three = { 3, 3 },
    ten = { 10, 10 },
)]
fn signals_after_exactly_cap_messages(cap: u64, calls: u64) {
    let policy = TaskCountPolicy::new(cap);
    let mut signaled_at = None;
    for i in 1..=calls {
        if policy.after_process_message().is_some() {
            signaled_at = Some(i);
            break;
        }
    }
    assert_eq!(signaled_at, Some(cap));
}
