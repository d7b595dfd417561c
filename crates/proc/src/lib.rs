// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-level machinery shared by the worker and fork subprocess
//! entrypoints and the master supervisor that spawns them: the broker/
//! worker-pool boundary, the signal discipline both subprocess kinds share,
//! the log multiplexer the master drains their output through, and the
//! closed name registry that stands in for dynamic module import.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod broker;
pub mod entrypoint;
pub mod log_mux;
pub mod registry;
pub mod signal;
pub mod worker_pool;

pub use broker::{Broker, BrokerError, BrokerEvent, NullBroker};
pub use entrypoint::{run_fork, run_worker, WorkerConfig};
pub use log_mux::{run_log_mux, run_log_mux_dynamic, LogMuxError, LogSource};
pub use registry::{BrokerFactory, ForkFn, ProcRegistry, RegistryError};
pub use signal::{Escalation, SignalDiscipline};
pub use worker_pool::{SimWorkerPool, WorkerPool, WorkerPoolError};
