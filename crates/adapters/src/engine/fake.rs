// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake engine for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{EngineError, EngineEvents, EngineFactory, ExecutionEngine};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use volley_core::{EngineEvent, ResolvedRunOptions, Script};

/// What an engine was constructed with
#[derive(Debug, Clone)]
pub struct CreatedRun {
    pub script: Script,
    pub has_processor: bool,
    pub file_refs: Vec<String>,
    pub payload: Option<serde_json::Value>,
    pub script_path: PathBuf,
}

/// Fake factory whose engines replay a scripted event list
#[derive(Clone, Default)]
pub struct FakeEngineFactory {
    events: Arc<Mutex<Vec<EngineEvent>>>,
    created: Arc<Mutex<Vec<CreatedRun>>>,
    hang: Arc<AtomicBool>,
    fail_run: Arc<Mutex<Option<String>>>,
}

impl FakeEngineFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events every engine emits when run
    pub fn with_events(events: Vec<EngineEvent>) -> Self {
        let factory = Self::default();
        *factory.events.lock().unwrap_or_else(|e| e.into_inner()) = events;
        factory
    }

    /// After emitting, never finish (simulates a long run)
    pub fn hang_after_events(&self) {
        self.hang.store(true, Ordering::SeqCst);
    }

    /// After emitting, fail the run with `message`
    pub fn fail_after_events(&self, message: &str) {
        *self.fail_run.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.to_string());
    }

    /// Engines constructed so far
    pub fn created(&self) -> Vec<CreatedRun> {
        self.created.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl EngineFactory for FakeEngineFactory {
    fn create(&self, opts: ResolvedRunOptions) -> Result<Box<dyn ExecutionEngine>, EngineError> {
        self.created
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(CreatedRun {
                script: opts.script.clone(),
                has_processor: opts.processor.is_some(),
                file_refs: opts.files.references().map(str::to_string).collect(),
                payload: opts.payload.clone(),
                script_path: opts.options.script_path.clone(),
            });

        Ok(Box::new(FakeEngine {
            events: self.events.lock().unwrap_or_else(|e| e.into_inner()).clone(),
            hang: self.hang.load(Ordering::SeqCst),
            fail: self.fail_run.lock().unwrap_or_else(|e| e.into_inner()).clone(),
        }))
    }
}

struct FakeEngine {
    events: Vec<EngineEvent>,
    hang: bool,
    fail: Option<String>,
}

#[async_trait]
impl ExecutionEngine for FakeEngine {
    async fn run(self: Box<Self>, events: EngineEvents) -> Result<(), EngineError> {
        for event in self.events {
            events.emit(event);
            tokio::task::yield_now().await;
        }
        if let Some(message) = self.fail {
            return Err(EngineError::Failed(message));
        }
        if self.hang {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}
