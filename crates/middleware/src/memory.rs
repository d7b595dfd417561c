// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Memory restart policy (spec §4.C "Memory variant").
//!
//! Corrects the source's bug where the trigger compares against the
//! wrong field (`self.max_tasks_per_child` instead of
//! `self.max_memory_per_child`, see spec §9) by simply naming the field
//! correctly; the intended predicate, `rss >= max_memory_per_child`, was
//! never in question.

use crate::policy::{RestartPolicy, RestartWorker};
use crate::rss::{RssSampler, SystemRssSampler};

/// Restarts the worker once its RSS reaches `max_memory_per_child` bytes.
/// A cap of `0` disables the policy.
pub struct MemoryPolicy<S: RssSampler = SystemRssSampler> {
    max_memory_per_child: u64,
    sampler: S,
}

impl MemoryPolicy<SystemRssSampler> {
    pub fn new(max_memory_per_child: u64) -> Self {
        Self::with_sampler(max_memory_per_child, SystemRssSampler)
    }
}

impl<S: RssSampler> MemoryPolicy<S> {
    pub fn with_sampler(max_memory_per_child: u64, sampler: S) -> Self {
        Self {
            max_memory_per_child,
            sampler,
        }
    }
}

impl<S: RssSampler> RestartPolicy for MemoryPolicy<S> {
    fn after_process_message(&self) -> Option<RestartWorker> {
        if self.max_memory_per_child == 0 {
            return None;
        }
        let rss = self.sampler.rss_bytes();
        (rss >= self.max_memory_per_child).then_some(RestartWorker)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
