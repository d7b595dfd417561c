// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn apply_propagate_passes_through_values() {
    let record = ResultRecord::result(json!(42));
    let outcome = apply_propagate(record, true).unwrap();
    assert_eq!(outcome, Outcome::Value(json!(42)));
}

#[test]
fn apply_propagate_true_surfaces_exception_as_error() {
    let exc = RemoteException::new("ValueError", vec![json!("bad")]);
    let record = ResultRecord::exception(exc);
    let err = apply_propagate(record, true).unwrap_err();
    assert!(matches!(err, ResultError::Storage(_)));
}

#[test]
fn apply_propagate_false_returns_exception_value() {
    let exc = RemoteException::new("ValueError", vec![json!("bad")]);
    let record = ResultRecord::exception(exc.clone());
    let outcome = apply_propagate(record, false).unwrap();
    assert_eq!(outcome, Outcome::Exception(exc));
}

#[test]
fn default_get_options_match_spec_defaults() {
    let options = GetOptions::default();
    assert!(!options.block);
    assert_eq!(options.timeout_ms, DEFAULT_TIMEOUT_MS);
    assert!(options.propagate);
}
