// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events reported from a worker to the orchestrator

use crate::id::WorkerId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle events emitted by an execution engine during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EngineEvent {
    /// A phase began
    PhaseStarted { phase: Value },
    /// A phase finished
    PhaseCompleted { phase: Value },
    /// Periodic statistics
    Stats { stats: Value },
    /// The run concluded; carries the final report
    Done { report: Value },
}

impl EngineEvent {
    /// Wire name of the event kind
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::PhaseStarted { .. } => "phaseStarted",
            EngineEvent::PhaseCompleted { .. } => "phaseCompleted",
            EngineEvent::Stats { .. } => "stats",
            EngineEvent::Done { .. } => "done",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, EngineEvent::Done { .. })
    }
}

/// An engine event tagged with the identity of the worker that produced it
///
/// Serializes flat: `{"pid": 123, "event": "stats", "stats": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerMessage {
    pub pid: WorkerId,
    #[serde(flatten)]
    pub event: EngineEvent,
}

impl WorkerMessage {
    pub fn tag(pid: WorkerId, event: EngineEvent) -> Self {
        Self { pid, event }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
