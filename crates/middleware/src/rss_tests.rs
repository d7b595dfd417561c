// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_sampler_reports_a_nonzero_rss_on_linux() {
    let sampler = SystemRssSampler;
    let rss = sampler.rss_bytes();
    if cfg!(target_os = "linux") {
        assert!(rss > 0, "expected a live process to report nonzero RSS");
    } else {
        assert_eq!(rss, 0);
    }
}
