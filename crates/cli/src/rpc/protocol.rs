// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request/response envelopes exchanged with the server.
//!
//! Every call is one JSON frame each way:
//!
//! ```text
//! → {"id": 7, "method": "query_items", "authorization": "Bearer …", "params": {…}}
//! ← {"id": 7, "result": […]}
//! ← {"id": 7, "error": {"kind": "fault", "code": "ItemNotFound", "message": "…"}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tfsync_core::{RemoteError, RemoteErrorKind, RemoteResult};

/// A call sent to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
    pub params: Value,
}

impl Request {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Request {
            id,
            method: method.into(),
            authorization: None,
            params,
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Failure reported by the server for one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default = "default_kind")]
    pub kind: RemoteErrorKind,
    pub code: String,
    pub message: String,
}

fn default_kind() -> RemoteErrorKind {
    RemoteErrorKind::Fault
}

/// The server's answer to one [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    pub fn ok(id: u64, result: Value) -> Self {
        Response {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: u64, kind: RemoteErrorKind, code: &str, message: &str) -> Self {
        Response {
            id,
            result: None,
            error: Some(ErrorBody {
                kind,
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }

    /// Parse from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// The result value, or the reported error.
    ///
    /// A response with neither field carries a null result.
    pub fn into_result(self) -> RemoteResult<Value> {
        match (self.error, self.result) {
            (Some(error), _) => Err(RemoteError::new(error.kind, error.code, error.message)),
            (None, Some(value)) => Ok(value),
            (None, None) => Ok(Value::Null),
        }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
