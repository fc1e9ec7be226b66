// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Framing of RPC envelopes over a WebSocket.
//!
//! Each [`Request`] goes out as one text frame and each [`Response`] comes
//! back as one text or binary frame holding UTF-8 JSON. Control frames are
//! handled by tungstenite and never reach the client.

use std::future::Future;
use std::pin::Pin;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::protocol::{Request, Response};

/// Largest response frame accepted by default (64 MiB).
pub const DEFAULT_MAX_FRAME_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("not connected")]
    Closed,

    #[error("send failed: {0}")]
    Send(String),

    #[error("receive failed: {0}")]
    Receive(String),

    /// A frame arrived that does not hold a response envelope.
    #[error("bad response frame: {0}")]
    Frame(String),

    #[error("response frame of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by [`Transport`] methods.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// A bidirectional link carrying request and response envelopes.
///
/// [`RpcClient`](super::RpcClient) is generic over this so tests can swap
/// in an in-memory server.
pub trait Transport: Send + Sync {
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()>;

    fn disconnect(&mut self) -> TransportFuture<'_, ()>;

    fn send(&mut self, request: Request) -> TransportFuture<'_, ()>;

    /// Next response envelope, or `None` once the peer has closed.
    fn recv(&mut self) -> TransportFuture<'_, Option<Response>>;

    fn is_connected(&self) -> bool;
}

/// What one incoming WebSocket message means to the client.
#[derive(Debug)]
pub(crate) enum Frame {
    Response(Response),
    Closed,
    Ignored,
}

/// Interprets one incoming message, enforcing `limit` on payload size.
pub(crate) fn decode_frame(message: Message, limit: usize) -> TransportResult<Frame> {
    let text = match message {
        Message::Text(text) => text.as_str().to_owned(),
        Message::Binary(bytes) => {
            check_size(bytes.len(), limit)?;
            String::from_utf8(bytes.to_vec())
                .map_err(|e| TransportError::Frame(format!("binary frame is not UTF-8: {e}")))?
        }
        Message::Close(_) => return Ok(Frame::Closed),
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => return Ok(Frame::Ignored),
    };
    check_size(text.len(), limit)?;
    Response::from_json(&text)
        .map(Frame::Response)
        .map_err(|e| TransportError::Frame(e.to_string()))
}

fn check_size(size: usize, limit: usize) -> TransportResult<()> {
    if size > limit {
        return Err(TransportError::TooLarge { size, limit });
    }
    Ok(())
}

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

struct Link {
    sink: SplitSink<Socket, Message>,
    stream: SplitStream<Socket>,
}

/// [`Transport`] over tokio-tungstenite.
pub struct WebSocketTransport {
    link: Option<Link>,
    max_frame_bytes: usize,
}

impl WebSocketTransport {
    pub fn new() -> Self {
        WebSocketTransport {
            link: None,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }

    /// Overrides the largest response frame accepted.
    pub fn with_max_frame_bytes(mut self, limit: usize) -> Self {
        self.max_frame_bytes = limit;
        self
    }

    async fn write(link: &mut Link, request: &Request) -> TransportResult<()> {
        let json = request
            .to_json()
            .map_err(|e| TransportError::Send(format!("could not encode {}: {e}", request.method)))?;
        link.sink
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;
        // A dead socket should fail the call that wrote to it
        link.sink
            .flush()
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for WebSocketTransport {
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()> {
        let url = url.to_string();
        Box::pin(async move {
            let (socket, _) = tokio_tungstenite::connect_async(url.as_str())
                .await
                .map_err(|e| TransportError::Connect {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;
            let (sink, stream) = socket.split();
            self.link = Some(Link { sink, stream });
            tracing::debug!(%url, "websocket open");
            Ok(())
        })
    }

    fn disconnect(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            if let Some(mut link) = self.link.take() {
                if let Err(e) = link.sink.close().await {
                    tracing::debug!(error = %e, "websocket close failed");
                }
            }
            Ok(())
        })
    }

    fn send(&mut self, request: Request) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            let link = self.link.as_mut().ok_or(TransportError::Closed)?;
            let result = Self::write(link, &request).await;
            if result.is_err() {
                self.link = None;
            }
            result
        })
    }

    fn recv(&mut self) -> TransportFuture<'_, Option<Response>> {
        Box::pin(async move {
            let limit = self.max_frame_bytes;
            let link = self.link.as_mut().ok_or(TransportError::Closed)?;
            loop {
                let message = match link.stream.next().await {
                    Some(Ok(message)) => message,
                    Some(Err(e)) => {
                        self.link = None;
                        return Err(TransportError::Receive(e.to_string()));
                    }
                    None => {
                        self.link = None;
                        return Ok(None);
                    }
                };
                match decode_frame(message, limit)? {
                    Frame::Response(response) => return Ok(Some(response)),
                    Frame::Closed => {
                        self.link = None;
                        return Ok(None);
                    }
                    Frame::Ignored => {}
                }
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.link.is_some()
    }
}
