// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use tokio::io::duplex;

use super::*;

#[tokio::test]
async fn drains_a_single_source_and_appends_newline() {
    let (mut writer, reader) = duplex(64);
    let sources = vec![LogSource::new("worker-0", reader)];
    let mut sink = Vec::new();

    writer.write_all(b"hello").await.unwrap();
    drop(writer);

    run_log_mux(sources, &mut sink).await.unwrap();
    assert_eq!(sink, b"hello\n");
}

#[tokio::test]
async fn trims_trailing_newline_before_re_appending_one() {
    let (mut writer, reader) = duplex(64);
    let sources = vec![LogSource::new("worker-0", reader)];
    let mut sink = Vec::new();

    writer.write_all(b"hello\n").await.unwrap();
    drop(writer);

    run_log_mux(sources, &mut sink).await.unwrap();
    assert_eq!(sink, b"hello\n");
}

#[tokio::test]
async fn suppresses_an_empty_chunk() {
    let (mut writer, reader) = duplex(64);
    let sources = vec![LogSource::new("worker-0", reader)];
    let mut sink = Vec::new();

    writer.write_all(b"\n").await.unwrap();
    drop(writer);

    run_log_mux(sources, &mut sink).await.unwrap();
    assert!(sink.is_empty());
}

#[tokio::test]
async fn returns_once_all_sources_close() {
    let (writer_a, reader_a) = duplex(64);
    let (writer_b, reader_b) = duplex(64);
    let sources = vec![
        LogSource::new("worker-0", reader_a),
        LogSource::new("worker-1", reader_b),
    ];
    let mut sink = Vec::new();

    drop(writer_a);
    drop(writer_b);

    run_log_mux(sources, &mut sink).await.unwrap();
    assert!(sink.is_empty());
}

#[tokio::test]
async fn label_is_preserved_for_diagnostics() {
    let (_writer, reader) = duplex(64);
    let source = LogSource::new("fork-1", reader);
    assert_eq!(source.label(), "fork-1");
}

#[tokio::test]
async fn dynamic_mux_drains_a_source_added_after_it_starts() {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let mut sink = Vec::new();

    let (mut writer, reader) = duplex(64);
    writer.write_all(b"late").await.unwrap();
    tx.send(LogSource::new("worker-1", reader)).unwrap();
    drop(writer);
    drop(tx);

    run_log_mux_dynamic(Vec::new(), rx, &mut sink).await.unwrap();
    assert_eq!(sink, b"late\n");
}

#[tokio::test]
async fn dynamic_mux_returns_once_channel_closes_and_sources_drain() {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let mut sink = Vec::new();
    drop(tx);

    run_log_mux_dynamic(Vec::new(), rx, &mut sink).await.unwrap();
    assert!(sink.is_empty());
}
