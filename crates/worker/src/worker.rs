// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker: owns the lifecycle and drives the command loop
//!
//! Commands are handled strictly in arrival order. Engine events, engine
//! results and channel failures reach the loop through the fault queue, which
//! is always drained before the next command.

use crate::execution::ExecutionAdapter;
use crate::fault::{self, Fault, WorkerError};
use crate::relay::EventRelay;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use volley_adapters::{
    ChannelError, EngineError, EngineEvents, EngineFactory, InboundChannel, OutboundChannel,
    PluginLoader,
};
use volley_core::{Envelope, ExitStatus, Lifecycle, RunOptions, WorkerId, WorkerState};

/// A single worker process
pub struct Worker<O, L, F> {
    pub(crate) id: WorkerId,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) execution: ExecutionAdapter<L, F>,
    pub(crate) outbound: O,
    faults_tx: mpsc::UnboundedSender<Fault>,
    faults_rx: mpsc::UnboundedReceiver<Fault>,
}

impl<O, L, F> Worker<O, L, F>
where
    O: OutboundChannel,
    L: PluginLoader,
    F: EngineFactory,
{
    pub fn new(id: WorkerId, outbound: O, loader: L, engines: F) -> Self {
        let (faults_tx, faults_rx) = mpsc::unbounded_channel();
        Self {
            id,
            lifecycle: Lifecycle::new(),
            execution: ExecutionAdapter::new(loader, engines),
            outbound,
            faults_tx,
            faults_rx,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn state(&self) -> WorkerState {
        self.lifecycle.state()
    }

    /// Process commands until the worker is told to stop, loses its channel,
    /// or hits an internal fault.
    pub async fn run<I: InboundChannel>(mut self, inbound: I) -> ExitStatus {
        info!(pid = %self.id, "worker ready");
        let mut commands = spawn_reader(inbound);

        loop {
            let exit = tokio::select! {
                biased;
                Some(fault) = self.faults_rx.recv() => {
                    fault::handle(&mut self.lifecycle, self.id, fault)
                }
                received = commands.recv() => match received {
                    Some(Ok(envelope)) => self.dispatch(envelope),
                    Some(Err(e)) => self.fault(Fault::Channel(e)),
                    None => self.fault(Fault::Channel(ChannelError::Closed)),
                },
            };

            if let Some(exit) = exit {
                return self.finish(exit);
            }
        }
    }

    pub(crate) fn fault(&mut self, fault: Fault) -> Option<ExitStatus> {
        fault::handle(&mut self.lifecycle, self.id, fault)
    }

    /// Subscribe a relay, then start the engine and watch its result
    pub(crate) fn start_run(&mut self, opts: RunOptions) -> Option<ExitStatus> {
        let (events, rx) = EngineEvents::channel();
        EventRelay::new(self.id, self.outbound.clone()).spawn(rx, self.faults_tx.clone());

        match self.execution.start(opts, events) {
            Ok(engine) => {
                self.supervise(engine);
                None
            }
            Err(e) => self.fault(WorkerError::from(e).into()),
        }
    }

    fn supervise(&self, engine: JoinHandle<Result<(), EngineError>>) {
        let faults = self.faults_tx.clone();
        let id = self.id;
        tokio::spawn(async move {
            let error = match engine.await {
                Ok(Ok(())) => {
                    debug!(pid = %id, "engine finished");
                    return;
                }
                Ok(Err(e)) => WorkerError::Engine(e),
                Err(e) => WorkerError::EngineAborted(e.to_string()),
            };
            let _ = faults.send(error.into());
        });
    }

    fn finish(&mut self, exit: ExitStatus) -> ExitStatus {
        self.lifecycle.terminate();
        info!(pid = %self.id, code = exit.code(), "worker exiting");
        exit
    }
}

/// Read commands on a dedicated task.
///
/// Frame reads are not cancel-safe, so the loop never races one against
/// other work. The queue closes when the orchestrator closes the channel.
fn spawn_reader<I: InboundChannel>(
    mut inbound: I,
) -> mpsc::UnboundedReceiver<Result<Envelope, ChannelError>> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        loop {
            match inbound.recv().await {
                Ok(Some(envelope)) => {
                    if tx.send(Ok(envelope)).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    let _ = tx.send(Err(e));
                    break;
                }
            }
        }
    });
    rx
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
