// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution engine boundary
//!
//! The engine generates load and computes statistics. The worker only
//! constructs it, subscribes to its lifecycle events and triggers the run.

mod phased;

pub use phased::{PhaseSpec, PhasedEngine, PhasedEngineFactory};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CreatedRun, FakeEngineFactory};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use volley_core::{EngineEvent, ResolvedRunOptions};

/// Errors from constructing or running an engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid script: {0}")]
    InvalidScript(String),
    #[error("engine failed: {0}")]
    Failed(String),
}

/// Receiving end of an engine's event stream
pub type EventReceiver = mpsc::UnboundedReceiver<EngineEvent>;

/// Subscription handle given to an engine for the four lifecycle events
///
/// Events are queued in emission order; emitting never blocks the engine.
#[derive(Clone, Debug)]
pub struct EngineEvents {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EngineEvents {
    pub fn channel() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn phase_started(&self, phase: Value) {
        self.emit(EngineEvent::PhaseStarted { phase });
    }

    pub fn phase_completed(&self, phase: Value) {
        self.emit(EngineEvent::PhaseCompleted { phase });
    }

    pub fn stats(&self, stats: Value) {
        self.emit(EngineEvent::Stats { stats });
    }

    pub fn done(&self, report: Value) {
        self.emit(EngineEvent::Done { report });
    }

    pub fn emit(&self, event: EngineEvent) {
        // Receiver gone means the relay stopped; the process is on its way out
        if self.tx.send(event).is_err() {
            tracing::trace!("event dropped, relay stopped");
        }
    }
}

/// A constructed engine, ready to run once
#[async_trait]
pub trait ExecutionEngine: Send {
    async fn run(self: Box<Self>, events: EngineEvents) -> Result<(), EngineError>;
}

/// Builds engines from resolved run options
pub trait EngineFactory: Clone + Send + Sync + 'static {
    fn create(&self, opts: ResolvedRunOptions) -> Result<Box<dyn ExecutionEngine>, EngineError>;
}
