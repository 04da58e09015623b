// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker lifecycle state machine
//!
//! ```text
//! Idle ──run──▶ Running ──stop / channel fault──▶ ShuttingDown ──exit──▶ Terminated
//!   │                                                                        ▲
//!   └──────────────────────── internal fault (any state) ────────────────────┘
//! ```
//!
//! Every shutdown entry point goes through [`Lifecycle::shutdown`], which is
//! where idempotency is enforced.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Worker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerState {
    /// Waiting for a run command
    Idle,
    /// Executing a run
    Running,
    /// Shutdown authorized, process about to exit
    ShuttingDown,
    /// Process exit
    Terminated,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkerState::Idle => "idle",
            WorkerState::Running => "running",
            WorkerState::ShuttingDown => "shutting_down",
            WorkerState::Terminated => "terminated",
        };
        f.write_str(s)
    }
}

/// How the worker process ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Stop command or orchestrator unreachable
    Graceful,
    /// Uncaught internal fault
    Fault,
}

impl ExitStatus {
    /// Process exit code
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Graceful => 0,
            ExitStatus::Fault => 1,
        }
    }
}

/// Why a graceful shutdown was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Explicit stop command from the orchestrator
    StopCommand,
    /// The orchestrator can no longer be reached
    ChannelClosed,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::StopCommand => f.write_str("stop command"),
            ShutdownReason::ChannelClosed => f.write_str("orchestrator unreachable"),
        }
    }
}

/// Outcome of asking to start a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAdmission {
    /// Worker moved to `Running`; start the engine
    Admitted,
    /// A run is already in progress
    AlreadyRunning,
    /// Worker is shutting down or gone
    Refused,
}

/// The lifecycle of a single worker process
#[derive(Debug)]
pub struct Lifecycle {
    state: WorkerState,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: WorkerState::Idle,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// True once shutdown has been authorized (or the process is terminating)
    pub fn is_shutting_down(&self) -> bool {
        matches!(
            self.state,
            WorkerState::ShuttingDown | WorkerState::Terminated
        )
    }

    /// `Idle → Running`
    pub fn begin_run(&mut self) -> RunAdmission {
        match self.state {
            WorkerState::Idle => {
                self.state = WorkerState::Running;
                RunAdmission::Admitted
            }
            WorkerState::Running => RunAdmission::AlreadyRunning,
            WorkerState::ShuttingDown | WorkerState::Terminated => RunAdmission::Refused,
        }
    }

    /// `Idle | Running → ShuttingDown`
    ///
    /// Returns the exit status the first time only; later calls are no-ops.
    pub fn shutdown(&mut self, _reason: ShutdownReason) -> Option<ExitStatus> {
        if self.is_shutting_down() {
            return None;
        }
        self.state = WorkerState::ShuttingDown;
        Some(ExitStatus::Graceful)
    }

    /// `Any → Terminated` on an internal fault
    pub fn fail(&mut self) -> Option<ExitStatus> {
        if self.state == WorkerState::Terminated {
            return None;
        }
        self.state = WorkerState::Terminated;
        Some(ExitStatus::Fault)
    }

    /// `ShuttingDown → Terminated`, recorded just before the process exits
    pub fn terminate(&mut self) {
        if self.state == WorkerState::ShuttingDown {
            self.state = WorkerState::Terminated;
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
