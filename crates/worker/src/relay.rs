// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event relay: tags engine events with the worker id and forwards them

use crate::fault::Fault;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use volley_adapters::{ChannelError, EventReceiver, OutboundChannel};
use volley_core::{EngineEvent, WorkerId, WorkerMessage};

/// Forwards events to the orchestrator one at a time, in emission order.
pub struct EventRelay<O> {
    id: WorkerId,
    outbound: O,
}

impl<O: OutboundChannel> EventRelay<O> {
    pub fn new(id: WorkerId, outbound: O) -> Self {
        Self { id, outbound }
    }

    pub fn tag(&self, event: EngineEvent) -> WorkerMessage {
        WorkerMessage::tag(self.id, event)
    }

    /// Send one event; completes once the channel accepted it
    pub async fn forward(&self, event: EngineEvent) -> Result<(), ChannelError> {
        let message = self.tag(event);
        self.outbound.send(&message).await
    }

    /// Drain `events` until the queue closes or a send fails.
    ///
    /// The first failed send is reported as a channel fault and nothing is
    /// sent after it.
    pub fn spawn(self, mut events: EventReceiver, faults: mpsc::UnboundedSender<Fault>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if let Err(e) = self.forward(event).await {
                    let _ = faults.send(Fault::Channel(e));
                    return;
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod tests;
