// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! volley-core: data model for the volley load-test worker
//!
//! This crate provides:
//! - Commands received from the orchestrator and events sent back to it
//! - The worker lifecycle state machine
//! - Script-relative path resolution
//! - The processor plugin capability contract

pub mod command;
pub mod event;
pub mod id;
pub mod lifecycle;
pub mod path;
pub mod processor;

pub use command::{
    Command, CommandError, Envelope, ExecutionOptions, RunOptions, Script, ScriptConfig,
};
pub use event::{EngineEvent, WorkerMessage};
pub use id::WorkerId;
pub use lifecycle::{ExitStatus, Lifecycle, RunAdmission, ShutdownReason, WorkerState};
pub use path::PathResolver;
pub use processor::{
    Processor, ProcessorContext, ProcessorError, ProcessorOutcome, ResolvedFiles,
    ResolvedRunOptions,
};
