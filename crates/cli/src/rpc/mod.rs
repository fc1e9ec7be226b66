// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! RPC link to the version-control server.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐     ┌─────────────┐     ┌─────────────┐     ┌──────────┐
//! │   Workspace   │────►│ RpcRemote-  │────►│  RpcClient  │────►│Transport │
//! │ (tfsync-core) │◄────│    Store    │◄────│  (invoke)   │◄────│ (trait)  │
//! └───────────────┘     └─────────────┘     └─────────────┘     └──────────┘
//! ```
//!
//! # Flow
//!
//! Requests and responses are JSON envelopes matched by id. The remote
//! store turns each [`tfsync_core::RemoteStore`] method into one
//! [`RpcClient::invoke`] call; the client reconnects with exponential
//! backoff when the socket drops.

mod client;
mod protocol;
mod store;
mod transport;

pub use client::{RpcClient, RpcConfig};
pub use protocol::{ErrorBody, Request, Response};
pub use store::{download_file_name, RpcRemoteStore};
pub use transport::{
    Transport, TransportError, TransportFuture, TransportResult, WebSocketTransport,
};
