// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{build_default_registry, NULL_BROKER_NAME, NULL_FORK_NAME};

#[test]
fn the_null_broker_resolves() {
    let registry = build_default_registry();
    assert!(registry.resolve_broker(NULL_BROKER_NAME).is_ok());
}

#[test]
fn the_null_fork_resolves_and_exits_cleanly() {
    let registry = build_default_registry();
    let func = registry.resolve_fork(NULL_FORK_NAME).unwrap();
    assert_eq!(func(), 0);
}

#[test]
fn unknown_names_fail_to_resolve() {
    let registry = build_default_registry();
    assert!(registry.resolve_broker("myapp:broker").is_err());
    assert!(registry.resolve_fork("myapp:report_fork").is_err());
}
