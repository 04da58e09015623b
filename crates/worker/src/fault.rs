// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fault handling and termination policy
//!
//! Two fault channels end a worker:
//! - the orchestrator is unreachable: graceful shutdown, exit 0
//! - anything else unhandled: reported, exit 1
//!
//! OS termination signals end nothing. Only the command channel (or its
//! loss) may stop a worker.

use crate::execution::ExecutionError;
use thiserror::Error;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, error, info};
use volley_adapters::{ChannelError, EngineError};
use volley_core::{CommandError, ExitStatus, Lifecycle, ShutdownReason, WorkerId};

/// Internal faults: fatal, never retried
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("invalid command: {0}")]
    Command(#[from] CommandError),

    #[error("{0}")]
    Execution(#[from] ExecutionError),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("engine task aborted: {0}")]
    EngineAborted(String),
}

/// A fault reported to the worker loop
#[derive(Debug)]
pub enum Fault {
    /// The orchestrator channel is broken or closed
    Channel(ChannelError),
    /// An unhandled error inside the worker
    Internal(WorkerError),
}

impl From<WorkerError> for Fault {
    fn from(e: WorkerError) -> Self {
        Fault::Internal(e)
    }
}

/// Apply the termination policy for `fault`.
///
/// Returns the exit status if the process should end now.
pub fn handle(lifecycle: &mut Lifecycle, id: WorkerId, fault: Fault) -> Option<ExitStatus> {
    match fault {
        Fault::Channel(e) => {
            let exit = lifecycle.shutdown(ShutdownReason::ChannelClosed);
            if exit.is_some() {
                info!(
                    pid = %id,
                    error = %e,
                    "worker can't reach orchestrator, parent is probably dead, shutting down"
                );
            }
            exit
        }
        Fault::Internal(e) => {
            let exit = lifecycle.fail();
            if exit.is_some() {
                report(id, &e);
            }
            exit
        }
    }
}

/// Surface an internal fault to the operator.
///
/// Written to stderr directly as well as logged: logging may be filtered or
/// going to a file nobody is watching.
pub fn report(id: WorkerId, err: &dyn std::error::Error) {
    error!(pid = %id, error = %err, "internal fault");
    eprintln!("volley-worker[{}]: {}", id, err);
}

/// Exit with status 1 on any panic, on any task
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let id = WorkerId::current();
        error!(pid = %id, panic = %info, "internal fault");
        eprintln!("volley-worker[{}]: {}", id, info);
        std::process::exit(ExitStatus::Fault.code());
    }));
}

/// Install no-op handlers for SIGTERM and SIGINT.
///
/// Registering a handler replaces the default disposition, so these signals
/// no longer terminate the process.
pub fn ignore_signals(id: WorkerId) -> std::io::Result<()> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(()) = sigterm.recv() => debug!(pid = %id, signal = "SIGTERM", "signal ignored"),
                Some(()) = sigint.recv() => debug!(pid = %id, signal = "SIGINT", "signal ignored"),
                else => break,
            }
        }
    });

    Ok(())
}

#[cfg(test)]
#[path = "fault_tests.rs"]
mod tests;
