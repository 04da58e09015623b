// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory channel for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ChannelError, InboundChannel, OutboundChannel};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use volley_core::{Envelope, RunOptions, WorkerMessage};

/// Inbound side fed by a [`FakeInboundHandle`]
pub struct FakeInbound {
    rx: mpsc::UnboundedReceiver<Envelope>,
}

/// Plays the orchestrator: pushes envelopes, closes the channel on drop
#[derive(Clone)]
pub struct FakeInboundHandle {
    tx: mpsc::UnboundedSender<Envelope>,
}

impl FakeInbound {
    pub fn new() -> (Self, FakeInboundHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, FakeInboundHandle { tx })
    }
}

impl FakeInboundHandle {
    pub fn push(&self, envelope: Envelope) {
        let _ = self.tx.send(envelope);
    }

    pub fn run(&self, opts: &RunOptions) {
        if let Ok(envelope) = Envelope::run(opts) {
            self.push(envelope);
        }
    }

    pub fn stop(&self) {
        self.push(Envelope::stop());
    }

    /// Push a command with an arbitrary kind and no options
    pub fn raw(&self, command: &str) {
        self.push(Envelope {
            command: command.to_string(),
            opts: None,
        });
    }
}

#[async_trait]
impl InboundChannel for FakeInbound {
    async fn recv(&mut self) -> Result<Option<Envelope>, ChannelError> {
        Ok(self.rx.recv().await)
    }
}

/// Outbound side recording every delivered message
#[derive(Clone, Default)]
pub struct FakeOutbound {
    messages: Arc<Mutex<Vec<WorkerMessage>>>,
    attempts: Arc<AtomicUsize>,
    broken: Arc<AtomicBool>,
}

impl FakeOutbound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far
    pub fn messages(&self) -> Vec<WorkerMessage> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Send calls made so far, including failed ones
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Make every later send fail as if the orchestrator were gone
    pub fn break_channel(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl OutboundChannel for FakeOutbound {
    async fn send(&self, message: &WorkerMessage) -> Result<(), ChannelError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.broken.load(Ordering::SeqCst) {
            return Err(ChannelError::Closed);
        }
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
