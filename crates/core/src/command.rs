// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands sent by the orchestrator to a worker

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Errors turning an inbound envelope into a command
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("run command carries no options")]
    MissingRunOptions,
    #[error("invalid run options: {0}")]
    InvalidRunOptions(#[source] serde_json::Error),
}

/// Raw inbound message as it appears on the wire
///
/// `{"command": "run", "opts": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opts: Option<Value>,
}

impl Envelope {
    pub fn run(opts: &RunOptions) -> Result<Self, serde_json::Error> {
        Ok(Self {
            command: "run".to_string(),
            opts: Some(serde_json::to_value(opts)?),
        })
    }

    pub fn stop() -> Self {
        Self {
            command: "stop".to_string(),
            opts: None,
        }
    }
}

/// A command the worker acts on
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start executing a load-test run
    Run(Box<RunOptions>),
    /// Shut the worker down
    Stop,
    /// Any other command kind; dropped by the dispatcher
    Unknown(String),
}

impl Command {
    pub fn name(&self) -> &str {
        match self {
            Command::Run(_) => "run",
            Command::Stop => "stop",
            Command::Unknown(name) => name,
        }
    }
}

impl TryFrom<Envelope> for Command {
    type Error = CommandError;

    fn try_from(envelope: Envelope) -> Result<Self, Self::Error> {
        match envelope.command.as_str() {
            "run" => {
                let opts = envelope.opts.ok_or(CommandError::MissingRunOptions)?;
                let opts = serde_json::from_value(opts).map_err(CommandError::InvalidRunOptions)?;
                Ok(Command::Run(Box::new(opts)))
            }
            "stop" => Ok(Command::Stop),
            _ => Ok(Command::Unknown(envelope.command)),
        }
    }
}

/// Everything needed to execute one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    pub script: Script,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    pub options: ExecutionOptions,
}

/// Test script definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: ScriptConfig,
    /// Scenarios and anything else the engine understands
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// The `config` section of a script
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptConfig {
    /// Processor plugin path, relative to the script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    /// Logical name -> file path, relative to the script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Options controlling execution, including where the script lives
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOptions {
    pub script_path: PathBuf,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
