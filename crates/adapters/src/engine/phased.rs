// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal phase-driven engine
//!
//! Walks `config.phases` in order. Each phase launches its arrivals evenly
//! spread over the phase duration, calling the processor once per arrival.

use super::{EngineError, EngineEvents, EngineFactory, ExecutionEngine};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use volley_core::{Processor, ProcessorContext, ResolvedFiles, ResolvedRunOptions};

/// One entry of `config.phases`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSpec {
    #[serde(default)]
    pub name: Option<String>,
    /// Seconds
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub arrival_count: Option<u64>,
    /// Arrivals per second
    #[serde(default)]
    pub arrival_rate: Option<f64>,
}

impl PhaseSpec {
    /// Scenarios launched in this phase
    pub fn arrivals(&self) -> u64 {
        match (self.arrival_count, self.arrival_rate) {
            (Some(count), _) => count,
            (None, Some(rate)) => (rate * self.duration).round() as u64,
            (None, None) => 0,
        }
    }

    fn validate(&self, index: usize) -> Result<(), EngineError> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(EngineError::InvalidScript(format!(
                "phase {}: duration must be a non-negative number of seconds",
                index
            )));
        }
        if let Some(rate) = self.arrival_rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(EngineError::InvalidScript(format!(
                    "phase {}: arrivalRate must be non-negative",
                    index
                )));
            }
        }
        Ok(())
    }

    fn describe(&self, index: usize) -> Value {
        json!({
            "index": index,
            "name": self.name,
            "duration": self.duration,
            "arrivals": self.arrivals(),
        })
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    launched: u64,
    completed: u64,
    errors: u64,
}

impl Counts {
    fn add(&mut self, other: Counts) {
        self.launched += other.launched;
        self.completed += other.completed;
        self.errors += other.errors;
    }
}

/// Reference engine shipped with the worker binary
pub struct PhasedEngine {
    phases: Vec<PhaseSpec>,
    processor: Option<Arc<dyn Processor>>,
    rows: Vec<Value>,
    files: ResolvedFiles,
}

impl PhasedEngine {
    pub fn new(opts: ResolvedRunOptions) -> Result<Self, EngineError> {
        let phases: Vec<PhaseSpec> = match opts.script.config.rest.get("phases") {
            Some(phases) => serde_json::from_value(phases.clone())
                .map_err(|e| EngineError::InvalidScript(format!("phases: {}", e)))?,
            None => Vec::new(),
        };
        for (index, phase) in phases.iter().enumerate() {
            phase.validate(index)?;
        }

        let rows = match opts.payload {
            Some(Value::Array(rows)) => rows,
            Some(Value::Null) | None => Vec::new(),
            Some(row) => vec![row],
        };

        Ok(Self {
            phases,
            processor: opts.processor,
            rows,
            files: opts.files,
        })
    }

    pub fn phases(&self) -> &[PhaseSpec] {
        &self.phases
    }

    async fn launch(&self, phase: &PhaseSpec, scenario: u64) -> bool {
        let Some(processor) = &self.processor else {
            return true;
        };

        let payload = if self.rows.is_empty() {
            None
        } else {
            self.rows.get((scenario as usize) % self.rows.len()).cloned()
        };
        let ctx = ProcessorContext {
            phase: phase.name.clone(),
            scenario,
            vars: serde_json::Map::new(),
            payload,
        };

        match processor.call(ctx).await {
            Ok(outcome) => outcome.is_ok(),
            Err(e) => {
                tracing::debug!(scenario, error = %e, "scenario failed");
                false
            }
        }
    }
}

#[async_trait]
impl ExecutionEngine for PhasedEngine {
    async fn run(self: Box<Self>, events: EngineEvents) -> Result<(), EngineError> {
        let started = Instant::now();
        let mut totals = Counts::default();
        let mut scenario = 0u64;

        for (index, phase) in self.phases.iter().enumerate() {
            let info = phase.describe(index);
            events.phase_started(info.clone());

            let phase_started = Instant::now();
            let arrivals = phase.arrivals();
            let period = Duration::from_secs_f64(phase.duration);
            let mut counts = Counts::default();

            if arrivals == 0 {
                // A pause phase
                tokio::time::sleep(period).await;
            } else {
                let spacing = period / arrivals.min(u64::from(u32::MAX)) as u32;
                for _ in 0..arrivals {
                    counts.launched += 1;
                    if self.launch(phase, scenario).await {
                        counts.completed += 1;
                    } else {
                        counts.errors += 1;
                    }
                    scenario += 1;
                    tokio::time::sleep(spacing).await;
                }
            }

            events.stats(json!({
                "phase": index,
                "scenariosLaunched": counts.launched,
                "completed": counts.completed,
                "errors": counts.errors,
                "elapsedMs": phase_started.elapsed().as_millis() as u64,
            }));
            events.phase_completed(info);
            totals.add(counts);
        }

        events.done(json!({
            "phases": self.phases.len(),
            "scenariosLaunched": totals.launched,
            "completed": totals.completed,
            "errors": totals.errors,
            "durationMs": started.elapsed().as_millis() as u64,
            "files": self.files.references().collect::<Vec<_>>(),
        }));
        Ok(())
    }
}

/// Builds [`PhasedEngine`]s
#[derive(Clone, Copy, Debug, Default)]
pub struct PhasedEngineFactory;

impl PhasedEngineFactory {
    pub fn new() -> Self {
        Self
    }
}

impl EngineFactory for PhasedEngineFactory {
    fn create(&self, opts: ResolvedRunOptions) -> Result<Box<dyn ExecutionEngine>, EngineError> {
        Ok(Box::new(PhasedEngine::new(opts)?))
    }
}

#[cfg(test)]
#[path = "phased_tests.rs"]
mod tests;
