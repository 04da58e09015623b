// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::channel::{ChannelError, OutboundChannel};
use crate::plugin::{LoadError, PluginLoader};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use volley_core::{Processor, WorkerMessage};

/// Wrapper that adds tracing to any OutboundChannel
#[derive(Clone)]
pub struct TracedOutbound<O> {
    inner: O,
}

impl<O> TracedOutbound<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<O: OutboundChannel> OutboundChannel for TracedOutbound<O> {
    async fn send(&self, message: &WorkerMessage) -> Result<(), ChannelError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(message).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(()) => tracing::debug!(
                event = message.event.name(),
                elapsed_ms = elapsed.as_millis() as u64,
                "sent"
            ),
            Err(e) => tracing::warn!(
                event = message.event.name(),
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "send failed"
            ),
        }

        result
    }
}

/// Wrapper that adds tracing to any PluginLoader
#[derive(Clone)]
pub struct TracedPluginLoader<L> {
    inner: L,
}

impl<L> TracedPluginLoader<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }
}

impl<L: PluginLoader> PluginLoader for TracedPluginLoader<L> {
    fn load(&self, path: &Path) -> Result<Arc<dyn Processor>, LoadError> {
        let span = tracing::info_span!("plugin.load", path = %path.display());
        let _guard = span.enter();

        let result = self.inner.load(path);
        match &result {
            Ok(_) => tracing::info!("processor loaded"),
            Err(e) => tracing::error!(error = %e, "load failed"),
        }

        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
