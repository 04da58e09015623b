// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Processor plugin capability and run options with dependencies resolved

use crate::command::{ExecutionOptions, Script};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::fs::File;

/// Errors from invoking a processor
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("processor failed: {0}")]
    Failed(String),
    #[error("processor timed out after {0}ms")]
    Timeout(u64),
    #[error("invalid processor output: {0}")]
    InvalidOutput(String),
}

/// Input handed to a processor for one invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessorContext {
    /// Name of the phase the invocation belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// Sequence number of the scenario within the run
    pub scenario: u64,
    /// Variables visible to the processor
    #[serde(default)]
    pub vars: Map<String, Value>,
    /// Payload row assigned to this scenario
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// What a processor hands back
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessorOutcome {
    /// Variables set or updated by the processor
    #[serde(default)]
    pub vars: Map<String, Value>,
    /// Set when the processor reports a scenario error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessorOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// A loaded processor plugin
#[async_trait]
pub trait Processor: Send + Sync {
    async fn call(&self, ctx: ProcessorContext) -> Result<ProcessorOutcome, ProcessorError>;
}

/// Open file handles keyed by the path string the script referenced them by
#[derive(Debug, Default)]
pub struct ResolvedFiles {
    files: BTreeMap<String, File>,
}

impl ResolvedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: impl Into<String>, file: File) {
        self.files.insert(reference.into(), file);
    }

    pub fn get_mut(&mut self, reference: &str) -> Option<&mut File> {
        self.files.get_mut(reference)
    }

    /// Take ownership of a handle, e.g. to stream it
    pub fn take(&mut self, reference: &str) -> Option<File> {
        self.files.remove(reference)
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.files.contains_key(reference)
    }

    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Run options with the processor loaded and every file opened
pub struct ResolvedRunOptions {
    pub script: Script,
    pub processor: Option<Arc<dyn Processor>>,
    pub files: ResolvedFiles,
    pub payload: Option<Value>,
    pub options: ExecutionOptions,
}

impl fmt::Debug for ResolvedRunOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedRunOptions")
            .field("script", &self.script)
            .field("processor", &self.processor.is_some())
            .field("files", &self.files.references().collect::<Vec<_>>())
            .field("payload", &self.payload)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
