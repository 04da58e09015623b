// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command dispatch

use crate::fault::WorkerError;
use crate::worker::Worker;
use tracing::{debug, info, trace, warn};
use volley_adapters::{EngineFactory, OutboundChannel, PluginLoader};
use volley_core::{Command, Envelope, ExitStatus, RunAdmission, ShutdownReason};

impl<O, L, F> Worker<O, L, F>
where
    O: OutboundChannel,
    L: PluginLoader,
    F: EngineFactory,
{
    /// Act on one inbound message.
    ///
    /// Returns the exit status when the message ends the worker.
    pub(crate) fn dispatch(&mut self, envelope: Envelope) -> Option<ExitStatus> {
        let command = match Command::try_from(envelope) {
            Ok(command) => command,
            Err(e) => return self.fault(WorkerError::from(e).into()),
        };

        match command {
            Command::Run(opts) => match self.lifecycle.begin_run() {
                RunAdmission::Admitted => {
                    info!(pid = %self.id, script = %opts.options.script_path.display(), "run received");
                    self.start_run(*opts)
                }
                RunAdmission::AlreadyRunning => {
                    warn!(pid = %self.id, "run ignored, a run is already in progress");
                    None
                }
                RunAdmission::Refused => {
                    debug!(pid = %self.id, state = %self.lifecycle.state(), "run ignored");
                    None
                }
            },
            Command::Stop => {
                let exit = self.lifecycle.shutdown(ShutdownReason::StopCommand);
                if exit.is_some() {
                    info!(pid = %self.id, "stop received, shutting down");
                }
                exit
            }
            Command::Unknown(kind) => {
                trace!(pid = %self.id, command = %kind, "ignoring unknown command");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
