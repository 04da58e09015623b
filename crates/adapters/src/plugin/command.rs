// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executable processor plugins
//!
//! A processor is an executable. Each call spawns it, writes the context as
//! JSON to its stdin and reads a [`ProcessorOutcome`] as JSON from its stdout.

use super::{LoadError, PluginLoader};
use async_trait::async_trait;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use volley_core::{Processor, ProcessorContext, ProcessorError, ProcessorOutcome};

/// Loads executables as processors
#[derive(Clone, Debug)]
pub struct CommandPluginLoader {
    timeout: Duration,
}

impl CommandPluginLoader {
    /// `timeout` bounds every single invocation of a loaded processor
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl PluginLoader for CommandPluginLoader {
    fn load(&self, path: &Path) -> Result<Arc<dyn Processor>, LoadError> {
        let metadata =
            std::fs::metadata(path).map_err(|e| LoadError::NotFound(path.to_path_buf(), e))?;
        if !metadata.is_file() {
            return Err(LoadError::NotAFile(path.to_path_buf()));
        }
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(LoadError::NotExecutable(path.to_path_buf()));
        }

        Ok(Arc::new(CommandProcessor {
            path: path.to_path_buf(),
            timeout: self.timeout,
        }))
    }
}

/// A processor backed by an executable
#[derive(Clone, Debug)]
pub struct CommandProcessor {
    path: PathBuf,
    timeout: Duration,
}

impl CommandProcessor {
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn invoke(&self, input: Vec<u8>) -> Result<ProcessorOutcome, ProcessorError> {
        let mut child = Command::new(&self.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProcessorError::Failed(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A processor may exit without reading its input
            if let Err(e) = stdin.write_all(&input).await {
                tracing::debug!(error = %e, "processor closed stdin early");
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ProcessorError::Failed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProcessorError::Failed(format!(
                "exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Ok(ProcessorOutcome::default());
        }
        serde_json::from_str(stdout.trim()).map_err(|e| ProcessorError::InvalidOutput(e.to_string()))
    }
}

#[async_trait]
impl Processor for CommandProcessor {
    async fn call(&self, ctx: ProcessorContext) -> Result<ProcessorOutcome, ProcessorError> {
        let input = serde_json::to_vec(&ctx)
            .map_err(|e| ProcessorError::Failed(format!("encoding context: {}", e)))?;

        match tokio::time::timeout(self.timeout, self.invoke(input)).await {
            Ok(result) => result,
            Err(_) => Err(ProcessorError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
