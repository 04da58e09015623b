// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use volley_core::WorkerState;

fn id() -> WorkerId {
    WorkerId::new(77)
}

#[test]
fn channel_fault_is_a_graceful_shutdown() {
    let mut lifecycle = Lifecycle::new();
    lifecycle.begin_run();

    let exit = handle(&mut lifecycle, id(), Fault::Channel(ChannelError::Closed));

    assert_eq!(exit, Some(ExitStatus::Graceful));
    assert_eq!(lifecycle.state(), WorkerState::ShuttingDown);
}

#[test]
fn repeated_channel_faults_exit_once() {
    let mut lifecycle = Lifecycle::new();

    let first = handle(&mut lifecycle, id(), Fault::Channel(ChannelError::Closed));
    let second = handle(&mut lifecycle, id(), Fault::Channel(ChannelError::Closed));

    assert_eq!(first, Some(ExitStatus::Graceful));
    assert_eq!(second, None);
}

#[test]
fn internal_fault_exits_with_failure() {
    let mut lifecycle = Lifecycle::new();
    lifecycle.begin_run();

    let fault = Fault::Internal(WorkerError::Engine(EngineError::Failed("boom".into())));
    let exit = handle(&mut lifecycle, id(), fault);

    assert_eq!(exit, Some(ExitStatus::Fault));
    assert_eq!(exit.map(ExitStatus::code), Some(1));
    assert_eq!(lifecycle.state(), WorkerState::Terminated);
}

#[test]
fn internal_fault_overrides_pending_shutdown() {
    let mut lifecycle = Lifecycle::new();
    handle(&mut lifecycle, id(), Fault::Channel(ChannelError::Closed));

    let fault = Fault::Internal(WorkerError::EngineAborted("cancelled".into()));
    assert_eq!(handle(&mut lifecycle, id(), fault), Some(ExitStatus::Fault));
}

#[test]
fn worker_error_messages_name_the_cause() {
    let err = WorkerError::from(CommandError::MissingRunOptions);
    assert_eq!(err.to_string(), "invalid command: run command carries no options");
}
