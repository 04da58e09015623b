// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Processor plugin loading

mod command;

pub use command::{CommandPluginLoader, CommandProcessor};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePluginLoader, FakeProcessor};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use volley_core::Processor;

/// Errors from loading a plugin
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("processor not found at {0}: {1}")]
    NotFound(PathBuf, #[source] std::io::Error),
    #[error("processor at {0} is not a file")]
    NotAFile(PathBuf),
    #[error("processor at {0} is not executable")]
    NotExecutable(PathBuf),
}

/// Loads processor plugins by absolute path
///
/// Loading is synchronous and eager: a plugin that cannot be loaded fails
/// the run before the engine is constructed.
pub trait PluginLoader: Clone + Send + Sync + 'static {
    fn load(&self, path: &Path) -> Result<Arc<dyn Processor>, LoadError>;
}
