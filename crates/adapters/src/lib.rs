// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the worker's external collaborators: the orchestrator
//! channel, processor plugins and the execution engine

pub mod channel;
pub mod engine;
pub mod plugin;
pub mod traced;

pub use channel::{
    stdio, ChannelError, FramedInbound, FramedOutbound, InboundChannel, OutboundChannel,
};
pub use engine::{
    EngineError, EngineEvents, EngineFactory, EventReceiver, ExecutionEngine, PhasedEngine,
    PhasedEngineFactory,
};
pub use plugin::{CommandPluginLoader, LoadError, PluginLoader};
pub use traced::{TracedOutbound, TracedPluginLoader};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use channel::{FakeInbound, FakeInboundHandle, FakeOutbound};
#[cfg(any(test, feature = "test-support"))]
pub use engine::{CreatedRun, FakeEngineFactory};
#[cfg(any(test, feature = "test-support"))]
pub use plugin::{FakePluginLoader, FakeProcessor};
