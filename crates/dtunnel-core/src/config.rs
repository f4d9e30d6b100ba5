// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SDK configuration.

use serde::{Deserialize, Serialize};

/// Construction-time settings for an SDK instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SdkConfig {
    /// Raise every gateway failure to the caller instead of reporting it on
    /// the `error` channel and resolving to null.
    pub strict: bool,
    /// Install the native callback trampolines on construction.
    pub auto_register_native_events: bool,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            strict: false,
            auto_register_native_events: true,
        }
    }
}

impl SdkConfig {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}
