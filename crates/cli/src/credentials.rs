// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Access token taken from the environment.

use tfsync_core::{CredentialProvider, RemoteError, RemoteErrorKind, RemoteResult};

/// Reads a bearer token from an environment variable on every request, so
/// a token refreshed by an outside tool is picked up without a restart.
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    pub fn new(var: impl Into<String>) -> Self {
        EnvTokenProvider { var: var.into() }
    }

    /// Returns a provider when the variable is currently set.
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var_os(var).map(|_| Self::new(var))
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl CredentialProvider for EnvTokenProvider {
    fn authorization(&self) -> RemoteResult<String> {
        token_from(&self.var, |key| std::env::var(key).ok())
    }
}

fn token_from(var: &str, lookup: impl Fn(&str) -> Option<String>) -> RemoteResult<String> {
    match lookup(var).map(|token| token.trim().to_string()) {
        Some(token) if !token.is_empty() => Ok(format!("Bearer {token}")),
        _ => Err(RemoteError::new(
            RemoteErrorKind::Unauthorized,
            "MissingToken",
            format!("no access token in {var}\n  hint: export {var}=<token>"),
        )),
    }
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
