// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::channel::FakeOutbound;
use crate::plugin::FakePluginLoader;
use serde_json::json;
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use volley_core::{EngineEvent, WorkerId};

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::new();
    let logs_clone = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs_clone)
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

fn done_message() -> WorkerMessage {
    WorkerMessage::tag(WorkerId::new(11), EngineEvent::Done { report: json!({}) })
}

#[test]
fn traced_outbound_logs_successful_send() {
    let fake = FakeOutbound::new();
    let traced = TracedOutbound::new(fake.clone());

    let (logs, result) = with_tracing(|| async move { traced.send(&done_message()).await });

    assert!(result.is_ok());
    assert_eq!(fake.messages().len(), 1);
    assert!(logs.contains("sent"), "Should log send. Logs:\n{}", logs);
    assert!(logs.contains("done"), "Should log event kind. Logs:\n{}", logs);
}

#[test]
fn traced_outbound_logs_failure_and_passes_error_through() {
    let fake = FakeOutbound::new();
    fake.break_channel();
    let traced = TracedOutbound::new(fake);

    let (logs, result) = with_tracing(|| async move { traced.send(&done_message()).await });

    assert!(matches!(result, Err(ChannelError::Closed)));
    assert!(logs.contains("send failed"), "Logs:\n{}", logs);
    assert!(logs.contains("WARN"), "Should log at warn. Logs:\n{}", logs);
}

#[test]
fn traced_loader_logs_span_and_outcome() {
    let fake = FakePluginLoader::new();
    fake.set_missing("/scripts/missing");
    let traced = TracedPluginLoader::new(fake.clone());

    let (logs, ()) = with_tracing(|| async move {
        assert!(traced.load(Path::new("/scripts/proc")).is_ok());
        assert!(traced.load(Path::new("/scripts/missing")).is_err());
    });

    assert_eq!(fake.loads().len(), 2);
    assert!(logs.contains("plugin.load"), "Should log span name. Logs:\n{}", logs);
    assert!(logs.contains("processor loaded"), "Logs:\n{}", logs);
    assert!(logs.contains("load failed"), "Logs:\n{}", logs);
    assert!(logs.contains("/scripts/missing"), "Logs:\n{}", logs);
}
