// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for DTunnel.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Failure raised by a host capability method.
///
/// This is what a host method "throwing" looks like on the Rust side. The
/// gateway wraps it as the `cause` of a `BRIDGE_CALL_FAILED` record.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct HostFault {
    pub message: String,
}

impl HostFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Classification of a bridge failure. Serialized as the wire strings a
/// WebView page would see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BridgeErrorCode {
    /// The named capability object is absent or falsy on the host.
    BridgeObjectNotFound,
    /// The object exists but does not expose the requested method.
    BridgeMethodNotFound,
    /// The method was invoked and failed.
    BridgeCallFailed,
}

impl BridgeErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BridgeObjectNotFound => "BRIDGE_OBJECT_NOT_FOUND",
            Self::BridgeMethodNotFound => "BRIDGE_METHOD_NOT_FOUND",
            Self::BridgeCallFailed => "BRIDGE_CALL_FAILED",
        }
    }
}

impl std::fmt::Display for BridgeErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enough context to reproduce the failing call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    pub object_name: String,
    pub method_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<HostFault>,
}

/// Error record produced by the bridge gateway.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct BridgeError {
    pub code: BridgeErrorCode,
    pub message: String,
    pub details: ErrorDetails,
}

impl BridgeError {
    pub fn object_not_found(object_name: &str, method_name: &str) -> Self {
        Self {
            code: BridgeErrorCode::BridgeObjectNotFound,
            message: format!("bridge object not found: {object_name}"),
            details: ErrorDetails {
                object_name: object_name.to_owned(),
                method_name: method_name.to_owned(),
                args: None,
                cause: None,
            },
        }
    }

    pub fn method_not_found(object_name: &str, method_name: &str) -> Self {
        Self {
            code: BridgeErrorCode::BridgeMethodNotFound,
            message: format!("bridge method not found: {object_name}.{method_name}()"),
            details: ErrorDetails {
                object_name: object_name.to_owned(),
                method_name: method_name.to_owned(),
                args: None,
                cause: None,
            },
        }
    }

    pub fn call_failed(
        object_name: &str,
        method_name: &str,
        args: &[Value],
        cause: HostFault,
    ) -> Self {
        Self {
            code: BridgeErrorCode::BridgeCallFailed,
            message: format!("bridge call failed: {object_name}.{method_name}()"),
            details: ErrorDetails {
                object_name: object_name.to_owned(),
                method_name: method_name.to_owned(),
                args: Some(args.to_vec()),
                cause: Some(cause),
            },
        }
    }
}

/// Top-level error type for everything outside a single gateway call.
#[derive(Debug, Error)]
pub enum DtunnelError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("invalid simulator state: {0}")]
    InvalidState(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DtunnelError>;
