// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Length-prefixed JSON channel over byte streams (stdin/stdout in production)

use super::protocol::{self, ProtocolError};
use super::{ChannelError, InboundChannel, OutboundChannel};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use volley_core::{Envelope, WorkerMessage};

/// Channel pair over the process's stdin and stdout
pub fn stdio(
    send_timeout: Duration,
) -> (
    FramedInbound<tokio::io::Stdin>,
    FramedOutbound<tokio::io::Stdout>,
) {
    (
        FramedInbound::new(tokio::io::stdin()),
        FramedOutbound::new(tokio::io::stdout(), send_timeout),
    )
}

/// Reads framed envelopes from a byte stream
pub struct FramedInbound<R> {
    reader: R,
}

impl<R> FramedInbound<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl<R> InboundChannel for FramedInbound<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    async fn recv(&mut self) -> Result<Option<Envelope>, ChannelError> {
        loop {
            let body = match protocol::read_message(&mut self.reader).await {
                Ok(body) => body,
                Err(ProtocolError::ConnectionClosed) => return Ok(None),
                Err(e) => return Err(e.into()),
            };

            match protocol::decode::<Envelope>(&body) {
                Ok(envelope) => return Ok(Some(envelope)),
                // Not an envelope at all; same treatment as an unknown command
                Err(e) => tracing::debug!(error = %e, len = body.len(), "dropping undecodable message"),
            }
        }
    }
}

/// Writes framed messages to a byte stream
pub struct FramedOutbound<W> {
    writer: Arc<Mutex<W>>,
    timeout: Duration,
}

impl<W> FramedOutbound<W> {
    pub fn new(writer: W, timeout: Duration) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
            timeout,
        }
    }
}

impl<W> Clone for FramedOutbound<W> {
    fn clone(&self) -> Self {
        Self {
            writer: Arc::clone(&self.writer),
            timeout: self.timeout,
        }
    }
}

#[async_trait]
impl<W> OutboundChannel for FramedOutbound<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn send(&self, message: &WorkerMessage) -> Result<(), ChannelError> {
        let body = protocol::encode(message)?;
        let mut writer = self.writer.lock().await;
        tokio::time::timeout(self.timeout, protocol::write_message(&mut *writer, &body))
            .await
            .map_err(|_| ChannelError::Timeout(self.timeout))??;
        Ok(())
    }
}

#[cfg(test)]
#[path = "stdio_tests.rs"]
mod tests;
