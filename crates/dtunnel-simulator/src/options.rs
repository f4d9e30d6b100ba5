// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Simulator construction options.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulatorOptions {
    /// Raise the host callbacks a real device would fire on its own, e.g.
    /// `vpnState` after a VPN start.
    pub auto_events: bool,
    /// Install even when the host already exposes bridge objects.
    #[serde(rename = "allowInWebView")]
    pub allow_in_webview: bool,
    /// Patch merged over the baseline state.
    pub state: Option<Value>,
}

impl Default for SimulatorOptions {
    fn default() -> Self {
        Self {
            auto_events: true,
            allow_in_webview: false,
            state: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_json_keeps_defaults() {
        let options: SimulatorOptions =
            serde_json::from_value(json!({"allowInWebView": true})).expect("decode");
        assert!(options.auto_events);
        assert!(options.allow_in_webview);
        assert!(options.state.is_none());
    }
}
