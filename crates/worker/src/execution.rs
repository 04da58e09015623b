// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution adapter: turns run options into a running engine
//!
//! Dependencies are resolved eagerly, before the engine exists. A processor
//! that fails to load or a file that fails to open ends the run before any
//! event is emitted.

use std::path::PathBuf;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use volley_adapters::{EngineError, EngineEvents, EngineFactory, LoadError, PluginLoader};
use volley_core::{PathResolver, ResolvedFiles, ResolvedRunOptions, RunOptions};

/// Errors preparing a run
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("cannot resolve script location {0}: {1}")]
    ScriptPath(PathBuf, #[source] std::io::Error),

    #[error("failed to load processor: {0}")]
    Load(#[from] LoadError),

    #[error("failed to open file {reference} at {}: {source}", .path.display())]
    OpenFile {
        reference: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to construct engine: {0}")]
    Engine(#[from] EngineError),
}

/// Loads dependencies, constructs engines and starts them
#[derive(Clone)]
pub struct ExecutionAdapter<L, F> {
    loader: L,
    engines: F,
}

impl<L: PluginLoader, F: EngineFactory> ExecutionAdapter<L, F> {
    pub fn new(loader: L, engines: F) -> Self {
        Self { loader, engines }
    }

    /// Resolve against the process working directory
    pub fn resolve(&self, opts: RunOptions) -> Result<ResolvedRunOptions, ExecutionError> {
        let script_path = opts.options.script_path.clone();
        let resolver = PathResolver::for_script(&script_path)
            .map_err(|e| ExecutionError::ScriptPath(script_path, e))?;
        self.resolve_with(&resolver, opts)
    }

    /// Load the processor and open every declared file relative to the script
    pub fn resolve_with(
        &self,
        resolver: &PathResolver,
        opts: RunOptions,
    ) -> Result<ResolvedRunOptions, ExecutionError> {
        let RunOptions {
            mut script,
            payload,
            options,
        } = opts;

        let processor = match script.config.processor.take() {
            Some(reference) => {
                let path = resolver.resolve(&reference);
                debug!(reference = %reference, path = %path.display(), "loading processor");
                Some(self.loader.load(&path)?)
            }
            None => None,
        };

        let mut files = ResolvedFiles::new();
        for (name, reference) in script.config.files.take().unwrap_or_default() {
            let path = resolver.resolve(&reference);
            let file = std::fs::File::open(&path).map_err(|source| ExecutionError::OpenFile {
                reference: reference.clone(),
                path: path.clone(),
                source,
            })?;
            debug!(name = %name, reference = %reference, path = %path.display(), "opened file");
            // Keyed by the path string the script used, not the logical name
            files.insert(reference, tokio::fs::File::from_std(file));
        }

        Ok(ResolvedRunOptions {
            script,
            processor,
            files,
            payload,
            options,
        })
    }

    /// Resolve, construct the engine, subscribe it to `events` and start it.
    ///
    /// The engine runs on its own task; this returns as soon as it is spawned.
    pub fn start(
        &self,
        opts: RunOptions,
        events: EngineEvents,
    ) -> Result<JoinHandle<Result<(), EngineError>>, ExecutionError> {
        let resolved = self.resolve(opts)?;
        self.launch(resolved, events)
    }

    /// Construct and start an engine from already resolved options
    pub fn launch(
        &self,
        resolved: ResolvedRunOptions,
        events: EngineEvents,
    ) -> Result<JoinHandle<Result<(), EngineError>>, ExecutionError> {
        let files = resolved.files.len();
        let has_processor = resolved.processor.is_some();
        let engine = self.engines.create(resolved)?;

        info!(files, has_processor, "starting run");
        Ok(tokio::spawn(engine.run(events)))
    }
}

#[cfg(test)]
#[path = "execution_tests.rs"]
mod tests;
