// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel between the orchestrator and the worker

pub mod protocol;
mod stdio;

pub use protocol::ProtocolError;
pub use stdio::{stdio, FramedInbound, FramedOutbound};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeInbound, FakeInboundHandle, FakeOutbound};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use volley_core::{Envelope, WorkerMessage};

/// Errors from channel operations
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("send timed out after {0:?}")]
    Timeout(Duration),
    #[error("channel closed")]
    Closed,
}

/// Orchestrator → worker
#[async_trait]
pub trait InboundChannel: Send + 'static {
    /// Next message from the orchestrator.
    ///
    /// `Ok(None)` means the orchestrator closed its end.
    async fn recv(&mut self) -> Result<Option<Envelope>, ChannelError>;
}

/// Worker → orchestrator
#[async_trait]
pub trait OutboundChannel: Clone + Send + Sync + 'static {
    async fn send(&self, message: &WorkerMessage) -> Result<(), ChannelError>;
}
