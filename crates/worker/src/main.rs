// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Volley worker (volley-worker)
//!
//! Child process of an orchestrator. Commands arrive on stdin and events
//! leave on stdout, both as length-prefixed JSON frames. Nothing else may be
//! written to stdout.

use tracing::info;
use volley_adapters::{
    stdio, CommandPluginLoader, PhasedEngineFactory, TracedOutbound, TracedPluginLoader,
};
use volley_core::WorkerId;
use volley_worker::{fault, Config, Worker};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    fault::install_panic_hook();

    let id = WorkerId::current();
    let config = Config::from_env();

    let log_guard = match setup_logging(&config) {
        Ok(guard) => guard,
        Err(e) => {
            fault::report(id, &e);
            std::process::exit(1);
        }
    };

    if let Err(e) = fault::ignore_signals(id) {
        fault::report(id, &e);
        drop(log_guard);
        std::process::exit(1);
    }

    info!(pid = %id, "starting volley-worker");

    let (inbound, outbound) = stdio(config.send_timeout);
    let worker = Worker::new(
        id,
        TracedOutbound::new(outbound),
        TracedPluginLoader::new(CommandPluginLoader::new(config.processor_timeout)),
        PhasedEngineFactory::new(),
    );

    let exit = worker.run(inbound).await;

    // Flush buffered log lines before the process goes away
    drop(log_guard);
    std::process::exit(exit.code());
}

/// Log to the configured file, or to stderr
fn setup_logging(
    config: &Config,
) -> std::io::Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let (non_blocking, guard) = match &config.log_path {
        Some(path) => {
            let dir = match path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir,
                _ => std::path::Path::new("."),
            };
            let file_name = path.file_name().ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("log path has no file name: {}", path.display()),
                )
            })?;
            std::fs::create_dir_all(dir)?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name))
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(config.log_path.is_none()),
        )
        .init();

    Ok(guard)
}
