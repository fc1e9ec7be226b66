// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! RPC client with reconnect.
//!
//! Every remote call goes through [`RpcClient::invoke`], which encodes the
//! parameters, attaches the authorization value, waits for the response
//! with the matching id and decodes the result.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tfsync_core::{CredentialProvider, RemoteError, RemoteResult};

use super::protocol::{Request, Response};
use super::transport::{Transport, TransportError, WebSocketTransport};
use crate::config::ServerConfig;
use crate::error::{Error, Result};

/// Configuration for the RPC client.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// WebSocket URL of the server.
    pub url: String,
    /// Connection attempts before giving up.
    pub max_retries: u32,
    /// First delay between attempts in milliseconds; doubles per attempt.
    pub initial_delay_ms: u64,
    /// Cap on the delay between attempts in seconds.
    pub max_delay_secs: u64,
    /// Time to wait for one response in seconds.
    pub request_timeout_secs: u64,
}

impl RpcConfig {
    pub fn new(url: impl Into<String>) -> Self {
        RpcConfig {
            url: url.into(),
            max_retries: 10,
            initial_delay_ms: 100,
            max_delay_secs: 30,
            request_timeout_secs: 60,
        }
    }

    /// Builds the client configuration from the `[server]` section.
    pub fn from_server(server: &ServerConfig) -> Result<Self> {
        let url = server.url.clone().ok_or(Error::NoServer)?;
        Ok(RpcConfig {
            url,
            max_retries: server.max_retries.max(1),
            initial_delay_ms: server.initial_delay_ms,
            max_delay_secs: server.max_delay_secs,
            request_timeout_secs: server.request_timeout_secs,
        })
    }
}

/// Request/response client over a [`Transport`].
pub struct RpcClient<T: Transport = WebSocketTransport> {
    config: RpcConfig,
    transport: T,
    credentials: Option<Arc<dyn CredentialProvider>>,
    next_id: u64,
}

impl RpcClient<WebSocketTransport> {
    /// Create a client that talks WebSocket.
    pub fn new(config: RpcConfig) -> Self {
        Self::with_transport(config, WebSocketTransport::new())
    }
}

impl<T: Transport> RpcClient<T> {
    /// Create a client with a custom transport (for testing).
    pub fn with_transport(config: RpcConfig, transport: T) -> Self {
        RpcClient {
            config,
            transport,
            credentials: None,
            next_id: 0,
        }
    }

    /// Attach an authorization value to every request.
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Connect with exponential backoff retry.
    pub async fn connect_with_retry(&mut self) -> RemoteResult<()> {
        let mut attempt = 0;
        let mut delay_ms = self.config.initial_delay_ms;

        loop {
            attempt += 1;
            match self.transport.connect(&self.config.url).await {
                Ok(()) => {
                    tracing::debug!(url = %self.config.url, attempt, "connected to server");
                    return Ok(());
                }
                Err(e) if attempt >= self.config.max_retries => {
                    return Err(RemoteError::network(format!(
                        "could not reach {} after {} attempt(s): {}",
                        self.config.url, attempt, e
                    )));
                }
                Err(e) => {
                    tracing::debug!(attempt, delay_ms, error = %e, "connect failed, retrying");
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    delay_ms = std::cmp::min(delay_ms * 2, self.config.max_delay_secs * 1000);
                }
            }
        }
    }

    /// Disconnect from the server.
    pub async fn disconnect(&mut self) -> RemoteResult<()> {
        self.transport
            .disconnect()
            .await
            .map_err(|e| RemoteError::network(e.to_string()))
    }

    /// Performs one remote call.
    ///
    /// Connects first when needed. Responses with a different id are
    /// discarded; the call fails with a network error when the connection
    /// closes or the request timeout passes first.
    pub async fn invoke<P, R>(&mut self, method: &str, params: &P) -> RemoteResult<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        if !self.transport.is_connected() {
            self.connect_with_retry().await?;
        }

        let params = serde_json::to_value(params)
            .map_err(|e| RemoteError::malformed(format!("could not encode {method}: {e}")))?;
        self.next_id += 1;
        let id = self.next_id;
        let mut request = Request::new(id, method, params);
        if let Some(credentials) = &self.credentials {
            request.authorization = Some(credentials.authorization()?);
        }

        tracing::debug!(method, id, "rpc call");
        self.transport
            .send(request)
            .await
            .map_err(|e| RemoteError::network(e.to_string()))?;

        let secs = self.config.request_timeout_secs;
        let response = tokio::time::timeout(Duration::from_secs(secs), self.await_response(id))
            .await
            .map_err(|_| RemoteError::network(format!("{method} timed out after {secs}s")))??;

        let value = response.into_result()?;
        serde_json::from_value(value)
            .map_err(|e| RemoteError::malformed(format!("unexpected {method} result: {e}")))
    }

    async fn await_response(&mut self, id: u64) -> RemoteResult<Response> {
        loop {
            match self.transport.recv().await {
                Ok(Some(response)) if response.id == id => return Ok(response),
                Ok(Some(response)) => {
                    tracing::warn!(expected = id, got = response.id, "discarding stray response");
                }
                Ok(None) => {
                    return Err(RemoteError::network("connection closed before a response"))
                }
                Err(TransportError::Frame(message)) => {
                    return Err(RemoteError::malformed(message))
                }
                Err(e) => return Err(RemoteError::network(e.to_string())),
            }
        }
    }
}
