// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Load-generation worker
//!
//! A worker is spawned by an orchestrator, receives a run over its command
//! channel, executes it and streams engine events back until told to stop.

pub mod config;
mod dispatch;
pub mod execution;
pub mod fault;
pub mod relay;
pub mod worker;

pub use config::Config;
pub use execution::{ExecutionAdapter, ExecutionError};
pub use fault::{Fault, WorkerError};
pub use relay::EventRelay;
pub use worker::Worker;
