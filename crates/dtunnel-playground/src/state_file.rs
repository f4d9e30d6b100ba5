// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Loading of simulator state patches from disk.

use std::path::Path;

use dtunnel_core::error::{DtunnelError, Result};
use serde_json::Value;

/// Read a JSON state patch. The top-level value must be an object.
pub fn load_state_patch(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)?;
    let patch: Value = serde_json::from_str(&text)?;
    if !patch.is_object() {
        return Err(DtunnelError::InvalidState(format!(
            "{} must contain a JSON object",
            path.display()
        )));
    }
    Ok(patch)
}
