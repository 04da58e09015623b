// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use volley_adapters::{FakeEngineFactory, FakeInbound, FakeOutbound, FakePluginLoader};
use volley_core::EngineEvent;

type TestWorker = Worker<FakeOutbound, FakePluginLoader, FakeEngineFactory>;

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("test.yml"), "config: {}\n").unwrap();
    std::fs::write(dir.path().join("users.csv"), "name\nalice\n").unwrap();
    dir
}

fn run_options(script_path: &Path, config: serde_json::Value) -> RunOptions {
    serde_json::from_value(json!({
        "script": { "config": config, "scenarios": [{ "flow": [] }] },
        "options": { "scriptPath": script_path }
    }))
    .unwrap()
}

fn scripted_events() -> Vec<EngineEvent> {
    vec![
        EngineEvent::PhaseStarted {
            phase: json!({ "index": 0 }),
        },
        EngineEvent::Stats {
            stats: json!({ "requests": 10 }),
        },
        EngineEvent::PhaseCompleted {
            phase: json!({ "index": 0 }),
        },
        EngineEvent::Done {
            report: json!({ "requests": 10 }),
        },
    ]
}

fn worker(engines: FakeEngineFactory) -> (TestWorker, FakeOutbound) {
    let outbound = FakeOutbound::new();
    let worker = Worker::new(
        WorkerId::new(4242),
        outbound.clone(),
        FakePluginLoader::new(),
        engines,
    );
    (worker, outbound)
}

/// Poll until `condition` holds or a second passes
async fn wait_for(condition: impl Fn() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}

#[tokio::test]
async fn relays_run_events_then_stops_gracefully() {
    let dir = project();
    let (worker, outbound) = worker(FakeEngineFactory::with_events(scripted_events()));
    let (inbound, orchestrator) = FakeInbound::new();
    let task = tokio::spawn(worker.run(inbound));

    orchestrator.run(&run_options(&dir.path().join("test.yml"), json!({})));
    assert!(wait_for(|| outbound.messages().len() == 4).await);

    orchestrator.stop();
    assert_eq!(task.await.unwrap(), ExitStatus::Graceful);

    let messages = outbound.messages();
    let names: Vec<_> = messages.iter().map(|m| m.event.name()).collect();
    assert_eq!(names, vec!["phaseStarted", "stats", "phaseCompleted", "done"]);
    assert!(messages.iter().all(|m| m.pid == WorkerId::new(4242)));
}

#[tokio::test]
async fn stop_during_run_exits_without_waiting_for_engine() {
    let dir = project();
    let engines = FakeEngineFactory::with_events(vec![EngineEvent::PhaseStarted {
        phase: json!({ "index": 0 }),
    }]);
    engines.hang_after_events();
    let (worker, outbound) = worker(engines);
    let (inbound, orchestrator) = FakeInbound::new();
    let task = tokio::spawn(worker.run(inbound));

    orchestrator.run(&run_options(&dir.path().join("test.yml"), json!({})));
    assert!(wait_for(|| outbound.messages().len() == 1).await);
    orchestrator.stop();

    let exit = tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(exit, ExitStatus::Graceful);
    assert!(!outbound.messages().iter().any(|m| m.event.is_done()));
}

#[tokio::test]
async fn stop_while_idle_exits_gracefully() {
    let (worker, outbound) = worker(FakeEngineFactory::new());
    let (inbound, orchestrator) = FakeInbound::new();

    orchestrator.stop();
    orchestrator.stop();

    assert_eq!(worker.run(inbound).await, ExitStatus::Graceful);
    assert!(outbound.messages().is_empty());
}

#[tokio::test]
async fn closed_command_channel_exits_gracefully() {
    let (worker, _) = worker(FakeEngineFactory::new());
    let (inbound, orchestrator) = FakeInbound::new();
    drop(orchestrator);

    assert_eq!(worker.run(inbound).await, ExitStatus::Graceful);
}

#[tokio::test]
async fn unreachable_orchestrator_during_run_exits_gracefully() {
    let dir = project();
    let (worker, outbound) = worker(FakeEngineFactory::with_events(scripted_events()));
    outbound.break_channel();
    let (inbound, orchestrator) = FakeInbound::new();

    orchestrator.run(&run_options(&dir.path().join("test.yml"), json!({})));
    let exit = tokio::time::timeout(Duration::from_secs(1), worker.run(inbound))
        .await
        .unwrap();

    assert_eq!(exit, ExitStatus::Graceful);
    assert_eq!(outbound.attempts(), 1);
    drop(orchestrator);
}

#[tokio::test]
async fn missing_file_is_an_internal_fault() {
    let dir = project();
    let engines = FakeEngineFactory::with_events(scripted_events());
    let (worker, outbound) = worker(engines.clone());
    let (inbound, orchestrator) = FakeInbound::new();

    orchestrator.run(&run_options(
        &dir.path().join("test.yml"),
        json!({ "files": { "users": "./nope.csv" } }),
    ));

    assert_eq!(worker.run(inbound).await, ExitStatus::Fault);
    assert!(outbound.messages().is_empty());
    assert!(engines.created().is_empty());
    drop(orchestrator);
}

#[tokio::test]
async fn run_without_options_is_an_internal_fault() {
    let (worker, outbound) = worker(FakeEngineFactory::new());
    let (inbound, orchestrator) = FakeInbound::new();

    orchestrator.raw("run");

    assert_eq!(worker.run(inbound).await, ExitStatus::Fault);
    assert!(outbound.messages().is_empty());
}

#[tokio::test]
async fn failing_engine_is_an_internal_fault() {
    let dir = project();
    let engines = FakeEngineFactory::with_events(vec![EngineEvent::PhaseStarted {
        phase: json!({ "index": 0 }),
    }]);
    engines.fail_after_events("target refused connection");
    let (worker, _) = worker(engines);
    let (inbound, orchestrator) = FakeInbound::new();

    orchestrator.run(&run_options(&dir.path().join("test.yml"), json!({})));
    let exit = tokio::time::timeout(Duration::from_secs(1), worker.run(inbound))
        .await
        .unwrap();

    assert_eq!(exit, ExitStatus::Fault);
    drop(orchestrator);
}

#[tokio::test]
async fn unknown_commands_are_ignored() {
    let (worker, outbound) = worker(FakeEngineFactory::new());
    let (inbound, orchestrator) = FakeInbound::new();

    orchestrator.raw("pause");
    orchestrator.raw("");
    orchestrator.stop();

    assert_eq!(worker.run(inbound).await, ExitStatus::Graceful);
    assert!(outbound.messages().is_empty());
    assert_eq!(outbound.attempts(), 0);
}

#[tokio::test]
async fn second_run_is_ignored() {
    let dir = project();
    let engines = FakeEngineFactory::with_events(scripted_events());
    engines.hang_after_events();
    let (worker, outbound) = worker(engines.clone());
    let (inbound, orchestrator) = FakeInbound::new();
    let task = tokio::spawn(worker.run(inbound));

    let opts = run_options(&dir.path().join("test.yml"), json!({}));
    orchestrator.run(&opts);
    orchestrator.run(&opts);
    assert!(wait_for(|| outbound.messages().len() == 4).await);
    orchestrator.stop();

    assert_eq!(task.await.unwrap(), ExitStatus::Graceful);
    assert_eq!(engines.created().len(), 1);
    assert_eq!(outbound.messages().len(), 4);
}

#[test]
fn new_worker_is_idle() {
    let (worker, _) = worker(FakeEngineFactory::new());
    assert_eq!(worker.id(), WorkerId::new(4242));
    assert_eq!(worker.state(), WorkerState::Idle);
}
