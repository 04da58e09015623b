// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker configuration from the environment

use std::path::PathBuf;
use std::time::Duration;

/// Log file; logs go to stderr when unset
pub const ENV_LOG_PATH: &str = "VOLLEY_WORKER_LOG";
/// Timeout for one outbound message, in milliseconds
pub const ENV_SEND_TIMEOUT_MS: &str = "VOLLEY_SEND_TIMEOUT_MS";
/// Timeout for one processor invocation, in milliseconds
pub const ENV_PROCESSOR_TIMEOUT_MS: &str = "VOLLEY_PROCESSOR_TIMEOUT_MS";

const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_PROCESSOR_TIMEOUT: Duration = Duration::from_secs(30);

fn parse_duration_ms(value: Option<String>) -> Option<Duration> {
    value
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Worker configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_path: Option<PathBuf>,
    pub send_timeout: Duration,
    pub processor_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_path: None,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            processor_timeout: DEFAULT_PROCESSOR_TIMEOUT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unparseable values fall back
    /// to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_path: lookup(ENV_LOG_PATH)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            send_timeout: parse_duration_ms(lookup(ENV_SEND_TIMEOUT_MS))
                .unwrap_or(defaults.send_timeout),
            processor_timeout: parse_duration_ms(lookup(ENV_PROCESSOR_TIMEOUT_MS))
                .unwrap_or(defaults.processor_timeout),
        }
    }
}
