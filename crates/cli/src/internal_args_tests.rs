// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;

use super::{InternalForkArgs, InternalWorkerArgs};

#[test]
fn worker_args_round_trip_through_the_argv_spawn_builds() {
    let args = InternalWorkerArgs::try_parse_from([
        "foreman",
        "--index",
        "3",
        "--broker-ref",
        "myapp:broker",
        "--threads",
        "8",
        "--module",
        "myapp.tasks",
        "--queue",
        "default",
        "--path",
        ".",
    ])
    .unwrap();

    assert_eq!(args.index, 3);
    assert_eq!(args.broker_ref, "myapp:broker");
    assert_eq!(args.modules, vec!["myapp.tasks"]);
    assert_eq!(args.queues, vec!["default"]);
    assert_eq!(args.paths, vec![std::path::PathBuf::from(".")]);
}

#[test]
fn fork_args_take_only_a_fork_ref() {
    let args = InternalForkArgs::try_parse_from(["foreman", "--fork-ref", "myapp:report_fork"]).unwrap();
    assert_eq!(args.fork_ref, "myapp:report_fork");
}
