// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker identity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a worker to the orchestrator.
///
/// The orchestrator spawns one process per worker, so the OS process id is
/// unique among concurrently running workers and is what it demultiplexes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(u32);

impl WorkerId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Identity of the current process
    pub fn current() -> Self {
        Self(std::process::id())
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
