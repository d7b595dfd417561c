// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn result_record_round_trips_as_actor_result() {
    let record = ResultRecord::result(json!({"ok": true}));
    let encoded = serde_json::to_string(&record).unwrap();
    assert_eq!(encoded, r#"{"actor_result":{"ok":true}}"#);

    let decoded: ResultRecord = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn result_record_round_trips_as_actor_exception() {
    let exc = RemoteException::new("ValueError", vec![json!("x")]).with_module("builtins");
    let record = ResultRecord::exception(exc.clone());
    let encoded = serde_json::to_string(&record).unwrap();

    let decoded: ResultRecord = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, record);
    assert!(decoded.is_exception());
}

#[test]
fn remote_exception_without_module_omits_mod_key() {
    let exc = RemoteException::new("Boom", vec![]);
    let encoded = serde_json::to_string(&exc).unwrap();
    assert!(!encoded.contains("\"mod\""));
}

#[test]
fn remote_exception_deserializes_without_mod_key_present() {
    let raw = r#"{"type":"Boom","args":[]}"#;
    let exc: RemoteException = serde_json::from_str(raw).unwrap();
    assert_eq!(exc.module_name, None);
}
