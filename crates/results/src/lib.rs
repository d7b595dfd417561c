// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! foreman-results: the result backend contract and its two
//! implementations — an in-memory stub for tests, and a durable backend
//! over Redis.

mod backend;
mod encoder;
mod memory;
mod redis_backend;
mod registry;

pub use backend::{
    GetOptions, Outcome, ResultBackend, ResultError, TaggedOutcome, DEFAULT_TIMEOUT_MS,
};
pub use encoder::{Encoder, EncoderError, JsonEncoder};
pub use memory::MemoryResultBackend;
pub use redis_backend::{RedisResultBackend, DEFAULT_NAMESPACE};
pub use registry::{
    ExceptionRegistry, ExceptionRegistryBuilder, KnownException, ReconstructedException,
};
