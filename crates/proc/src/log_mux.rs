// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The master's log multiplexer (spec §4.A): drains byte-delimited chunks
//! off a set of pipe read endpoints, decodes them UTF-8-lossy, trims
//! trailing newlines, and re-emits each as a single `"\n"`-terminated line
//! on a sink (stderr, or an append-mode file when `--log-file` is given).
//!
//! Runs as a foreground worker of the master rather than a background
//! task, since it may need to flush a file before the process exits; the
//! master joins it as part of its own shutdown sequence (spec §4.G).

use std::io;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

const POLL_TIMEOUT: Duration = Duration::from_secs(1);
const CHUNK_BUF_SIZE: usize = 8192;

#[derive(Debug, Error)]
pub enum LogMuxError {
    #[error("log sink write failed: {0}")]
    SinkWrite(#[from] io::Error),
}

/// One pipe read endpoint the multiplexer drains, tagged with a label used
/// only for diagnosing which source produced a given log line's chunk (the
/// chunk text itself is written verbatim, per spec — no prefix is added).
pub struct LogSource {
    label: String,
    reader: Pin<Box<dyn AsyncRead + Send>>,
    closed: bool,
}

impl LogSource {
    pub fn new(label: impl Into<String>, reader: impl AsyncRead + Send + 'static) -> Self {
        Self {
            label: label.into(),
            reader: Box::pin(reader),
            closed: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Drains `sources` until every endpoint has hit EOF, a broken pipe, or an
/// I/O error, writing decoded chunks to `sink`. Returns once the wait set
/// empties (spec §4.A: "When the wait set empties, the multiplexer
/// returns").
pub async fn run_log_mux<W>(mut sources: Vec<LogSource>, mut sink: W) -> Result<(), LogMuxError>
where
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; CHUNK_BUF_SIZE];

    while sources.iter().any(|s| !s.closed) {
        for source in sources.iter_mut().filter(|s| !s.closed) {
            match tokio::time::timeout(POLL_TIMEOUT, source.reader.read(&mut buf)).await {
                Ok(Ok(0)) => source.closed = true,
                Ok(Ok(n)) => {
                    if let Some(line) = decode_chunk(&buf[..n]) {
                        sink.write_all(line.as_bytes()).await?;
                        sink.write_all(b"\n").await?;
                    }
                }
                Ok(Err(e)) if is_broken_pipe(&e) => source.closed = true,
                Ok(Err(_)) => source.closed = true,
                Err(_) => {} // poll timeout: endpoint had nothing ready, try the next one
            }
        }
        sources.retain(|s| !s.closed);
    }

    sink.flush().await?;
    Ok(())
}

/// Like [`run_log_mux`], but also accepts newly spawned sources over
/// `new_sources` for as long as that channel stays open. Used by the
/// master supervisor, where a restarted worker gets a fresh stdout/stderr
/// pipe pair each respawn rather than literally reusing the old slot's
/// pipe end (the translation of spec §4.G step 2's "reusing the slot's
/// write pipe end" into a process-per-respawn model — see DESIGN.md). Runs
/// until the channel is closed *and* every known source is closed.
pub async fn run_log_mux_dynamic<W>(
    mut sources: Vec<LogSource>,
    mut new_sources: tokio::sync::mpsc::UnboundedReceiver<LogSource>,
    mut sink: W,
) -> Result<(), LogMuxError>
where
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; CHUNK_BUF_SIZE];
    let mut channel_open = true;

    loop {
        while let Ok(source) = new_sources.try_recv() {
            sources.push(source);
        }

        if !channel_open && sources.iter().all(|s| s.closed) {
            break;
        }

        if sources.iter().all(|s| s.closed) {
            // Nothing to poll right now; wait for either a new source or
            // the channel closing rather than busy-looping.
            match new_sources.recv().await {
                Some(source) => sources.push(source),
                None => channel_open = false,
            }
            continue;
        }

        for source in sources.iter_mut().filter(|s| !s.closed) {
            match tokio::time::timeout(POLL_TIMEOUT, source.reader.read(&mut buf)).await {
                Ok(Ok(0)) => source.closed = true,
                Ok(Ok(n)) => {
                    if let Some(line) = decode_chunk(&buf[..n]) {
                        sink.write_all(line.as_bytes()).await?;
                        sink.write_all(b"\n").await?;
                    }
                }
                Ok(Err(e)) if is_broken_pipe(&e) => source.closed = true,
                Ok(Err(_)) => source.closed = true,
                Err(_) => {}
            }
        }
        sources.retain(|s| !s.closed);

        if new_sources.is_closed() {
            channel_open = false;
        }
    }

    sink.flush().await?;
    Ok(())
}

fn is_broken_pipe(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::BrokenPipe | io::ErrorKind::UnexpectedEof)
}

/// Decode a raw chunk as UTF-8 (lossy), trim trailing newlines, and return
/// `None` if nothing is left — an empty chunk is never written (spec §4.A:
/// "this collapses the known writer pattern of emitting the message and
/// newline in separate writes").
fn decode_chunk(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim_end_matches(['\n', '\r']);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
#[path = "log_mux_tests.rs"]
mod tests;
