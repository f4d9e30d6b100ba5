// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Event types delivered to subscribers.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;
use crate::registry::SemanticEvent;

/// Catch-all channel that receives every native callback envelope.
pub const NATIVE_EVENT_CHANNEL: &str = "nativeEvent";

/// Channel that receives lenient-mode gateway failures.
pub const ERROR_CHANNEL: &str = "error";

/// Prefix for per-callback channels (`native:<CallbackName>`).
pub const NATIVE_CHANNEL_PREFIX: &str = "native:";

/// Per-callback channel name for a raw host callback.
pub fn native_channel(callback_name: &str) -> String {
    format!("{NATIVE_CHANNEL_PREFIX}{callback_name}")
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// One native callback invocation, translated for subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    /// Semantic event, or `None` when the callback is not in the registry.
    pub name: Option<SemanticEvent>,
    pub callback_name: String,
    /// `raw_payload` after the event's decoding policy.
    pub payload: Value,
    /// The single argument, or the whole argument list otherwise.
    pub raw_payload: Value,
    pub args: Vec<Value>,
    pub timestamp: i64,
}

/// Lenient-mode failure published on [`ERROR_CHANNEL`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Always [`ERROR_CHANNEL`].
    #[serde(default = "error_channel_name")]
    pub name: String,
    pub error: BridgeError,
    pub timestamp: i64,
}

impl ErrorEvent {
    /// Stamp `error` with the current time.
    pub fn new(error: BridgeError) -> Self {
        Self {
            name: error_channel_name(),
            error,
            timestamp: now_millis(),
        }
    }
}

fn error_channel_name() -> String {
    ERROR_CHANNEL.to_owned()
}

/// Everything the SDK event bus carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BridgeEvent {
    Native(EventEnvelope),
    Error(ErrorEvent),
}

impl BridgeEvent {
    pub fn as_envelope(&self) -> Option<&EventEnvelope> {
        match self {
            Self::Native(envelope) => Some(envelope),
            Self::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorEvent> {
        match self {
            Self::Error(event) => Some(event),
            Self::Native(_) => None,
        }
    }
}
