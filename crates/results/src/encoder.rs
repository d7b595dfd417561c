// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pluggable record encoding, mirroring the source's `Encoder` interface
//! (`dramatiq.encoder.JSONEncoder`) so the wire format isn't hardwired into
//! the backends.

use foreman_core::ResultRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("failed to encode result record: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode result record: {0}")]
    Decode(#[source] serde_json::Error),
}

pub trait Encoder: Send + Sync {
    fn encode(&self, record: &ResultRecord) -> Result<Vec<u8>, EncoderError>;
    fn decode(&self, bytes: &[u8]) -> Result<ResultRecord, EncoderError>;
}

/// The default (and, for now, only) encoder: `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl Encoder for JsonEncoder {
    fn encode(&self, record: &ResultRecord) -> Result<Vec<u8>, EncoderError> {
        serde_json::to_vec(record).map_err(EncoderError::Encode)
    }

    fn decode(&self, bytes: &[u8]) -> Result<ResultRecord, EncoderError> {
        serde_json::from_slice(bytes).map_err(EncoderError::Decode)
    }
}

#[cfg(test)]
#[path = "encoder_tests.rs"]
mod tests;
