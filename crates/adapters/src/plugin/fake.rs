// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake plugin loader for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{LoadError, PluginLoader};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use volley_core::{Processor, ProcessorContext, ProcessorError, ProcessorOutcome};

/// Fake loader: every path loads unless marked missing
#[derive(Clone, Default)]
pub struct FakePluginLoader {
    loads: Arc<Mutex<Vec<PathBuf>>>,
    missing: Arc<Mutex<HashSet<PathBuf>>>,
    processor: FakeProcessor,
}

impl FakePluginLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths passed to `load`, in order
    pub fn loads(&self) -> Vec<PathBuf> {
        self.loads.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make loading `path` fail
    pub fn set_missing(&self, path: impl Into<PathBuf>) {
        self.missing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.into());
    }

    /// The processor handed out for every successful load
    pub fn processor(&self) -> FakeProcessor {
        self.processor.clone()
    }
}

impl PluginLoader for FakePluginLoader {
    fn load(&self, path: &Path) -> Result<Arc<dyn Processor>, LoadError> {
        self.loads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(path.to_path_buf());

        if self
            .missing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(path)
        {
            return Err(LoadError::NotFound(
                path.to_path_buf(),
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ));
        }

        Ok(Arc::new(self.processor.clone()))
    }
}

/// Fake processor recording every context it is called with
#[derive(Clone, Default)]
pub struct FakeProcessor {
    calls: Arc<Mutex<Vec<ProcessorContext>>>,
}

impl FakeProcessor {
    pub fn calls(&self) -> Vec<ProcessorContext> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Processor for FakeProcessor {
    async fn call(&self, ctx: ProcessorContext) -> Result<ProcessorOutcome, ProcessorError> {
        let outcome = ProcessorOutcome {
            vars: ctx.vars.clone(),
            error: None,
        };
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ctx);
        Ok(outcome)
    }
}
