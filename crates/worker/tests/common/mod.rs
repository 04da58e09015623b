// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives a real worker process over its framed stdio channel.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, ExitStatus, Stdio};
use std::time::{Duration, Instant};

/// A spawned `volley-worker` playing against a test orchestrator
pub struct WorkerProcess {
    pub child: Child,
    stdin: Option<ChildStdin>,
    stdout: ChildStdout,
    stderr: BufReader<ChildStderr>,
}

impl WorkerProcess {
    /// Spawn the worker and wait until it accepts commands
    pub fn spawn() -> Self {
        let mut child = std::process::Command::new(env!("CARGO_BIN_EXE_volley-worker"))
            .env("RUST_LOG", "info")
            .env_remove("VOLLEY_WORKER_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn volley-worker");

        let stdin = child.stdin.take().expect("stdin");
        let stdout = child.stdout.take().expect("stdout");
        let stderr = BufReader::new(child.stderr.take().expect("stderr"));
        let mut worker = Self {
            child,
            stdin: Some(stdin),
            stdout,
            stderr,
        };
        worker.wait_for_log("worker ready");
        worker
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Read stderr lines until one contains `needle`
    pub fn wait_for_log(&mut self, needle: &str) -> String {
        let mut line = String::new();
        loop {
            line.clear();
            let n = self.stderr.read_line(&mut line).expect("read stderr");
            assert!(n > 0, "worker stderr closed before {:?} was logged", needle);
            if line.contains(needle) {
                return line.clone();
            }
        }
    }

    pub fn send(&mut self, message: &Value) {
        let stdin = self.stdin.as_mut().expect("stdin already closed");
        stdin.write_all(&frame(message)).expect("write frame");
        stdin.flush().expect("flush");
    }

    pub fn run(&mut self, opts: Value) {
        self.send(&json!({ "command": "run", "opts": opts }));
    }

    pub fn stop(&mut self) {
        self.send(&json!({ "command": "stop" }));
    }

    pub fn close_stdin(&mut self) {
        self.stdin.take();
    }

    /// Next event frame, or `None` once stdout is closed
    pub fn recv(&mut self) -> Option<Value> {
        let mut len = [0u8; 4];
        if self.stdout.read_exact(&mut len).is_err() {
            return None;
        }
        let mut body = vec![0u8; u32::from_be_bytes(len) as usize];
        self.stdout.read_exact(&mut body).expect("read body");
        Some(serde_json::from_slice(&body).expect("decode event"))
    }

    /// Everything left on stdout until the worker closes it
    pub fn drain_stdout(&mut self) -> Vec<u8> {
        let mut rest = Vec::new();
        self.stdout.read_to_end(&mut rest).expect("read stdout");
        rest
    }

    /// Remaining stderr output
    pub fn drain_stderr(&mut self) -> String {
        let mut rest = String::new();
        self.stderr.read_to_string(&mut rest).expect("read stderr");
        rest
    }

    /// Wait for exit, failing the test after `timeout`
    pub fn wait(&mut self, timeout: Duration) -> ExitStatus {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = self.child.try_wait().expect("try_wait") {
                return status;
            }
            if Instant::now() > deadline {
                let _ = self.child.kill();
                panic!("worker did not exit within {:?}", timeout);
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for WorkerProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// One length-prefixed frame, as the orchestrator writes it
pub fn frame(message: &Value) -> Vec<u8> {
    let body = serde_json::to_vec(message).expect("encode");
    let mut bytes = (body.len() as u32).to_be_bytes().to_vec();
    bytes.extend(body);
    bytes
}

/// Run options for a script at `script_path` with the given config
pub fn run_options(script_path: &Path, config: Value) -> Value {
    json!({
        "script": { "config": config, "scenarios": [{ "flow": [] }] },
        "payload": [["alice"], ["bob"]],
        "options": { "scriptPath": script_path }
    })
}
