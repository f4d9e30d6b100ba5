// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Simulator state record, plus the value coercions the mock host applies
// to incoming arguments.

use dtunnel_core::json::is_truthy;
use serde_json::{Map, Number, Value, json};

/// Top-level simulator state. Always a JSON object.
pub type State = Map<String, Value>;

/// Baseline state a fresh simulator answers with.
pub fn default_state() -> State {
    let default_item = json!({
        "id": 101,
        "name": "DTunnel BR",
        "description": "Local simulated server",
        "mode": "SSH_DIRECT",
        "sorter": 1,
        "icon": null,
    });

    let Value::Object(state) = json!({
        "username": "dtunnel-user",
        "password": "dtunnel-pass",
        "uuid": "550e8400-e29b-41d4-a716-446655440000",
        "localConfigVersion": 1,
        "cdnCount": 2,
        "configs": [{
            "id": 10,
            "name": "Brasil",
            "sorter": 1,
            "color": "#532e7d",
            "items": [default_item.clone()],
        }],
        "defaultConfig": config_summary(&default_item, json!(10)),
        "selectedConfigId": 101,
        "logs": [],
        "vpnState": "DISCONNECTED",
        "airplaneState": "INACTIVE",
        "assistantState": "ENABLED",
        "localIp": "192.168.0.2",
        "networkName": "dtunnel-Wifi",
        "pingResult": "42ms",
        "checkUserResult": {
            "username": "dtunnel-user",
            "count_connections": "1",
            "limit_connections": "2",
            "expiration_date": "2099-12-31",
            "expiration_days": "9999",
        },
        "checkUserError": "Simulated user check failure",
        "messageError": {
            "title": "Simulated error",
            "content": "Simulated error message",
        },
        "notification": {
            "title": "DTunnel Simulator",
            "message": "Simulated notification",
            "image": "",
        },
        "translations": {
            "LBL_VPN_CONNECTED": "VPN connected (simulated)",
            "LBL_VPN_DISCONNECTED": "VPN disconnected (simulated)",
        },
        "translationPrefix": "[sim] ",
        "appConfig": {
            "support_url": "https://example.com/support",
        },
        "deviceId": "dtunnel-device-id",
        "networkData": {
            "type_name": "WIFI",
            "extra_info": "dtunnel-network",
            "type": "MOBILE",
            "reason": null,
            "detailed_state": "CONNECTED",
        },
        "statusBarHeight": 24,
        "navigationBarHeight": 0,
        "hotSpotStatus": "STOPPED",
        "hotSpotPort": null,
        "networkDownloadBytes": 0,
        "networkUploadBytes": 0,
        "appVersion": "dtunnel-1.0.0",
        "lastExternalUrl": null,
        "lastAction": null,
        "lastWebViewUrl": null,
        "notifications": [],
        "closed": false,
    }) else {
        return State::new();
    };
    state
}

/// `defaultConfig` record for a selected config item.
pub fn config_summary(item: &Value, category_id: Value) -> Value {
    let field = |key: &str| item.get(key).cloned().unwrap_or(Value::Null);
    let or_empty = |key: &str| match item.get(key) {
        Some(value) if is_truthy(value) => value.clone(),
        _ => json!(""),
    };
    json!({
        "id": field("id"),
        "category_id": category_id,
        "name": field("name"),
        "description": or_empty("description"),
        "mode": field("mode"),
        "sorter": field("sorter"),
        "icon": or_empty("icon"),
    })
}

/// Merge `patch` into `base` in place.
///
/// Nested objects merge key by key; every other value, arrays included,
/// replaces what was there. A non-object patch changes nothing.
pub fn merge_deep(base: &mut State, patch: &Value) {
    let Value::Object(patch) = patch else {
        return;
    };
    for (key, incoming) in patch {
        match (base.get_mut(key), incoming) {
            (Some(Value::Object(existing)), Value::Object(_)) => merge_deep(existing, incoming),
            _ => {
                base.insert(key.clone(), incoming.clone());
            }
        }
    }
}

/// Round a finite number or numeric string to an integer, else `fallback`.
///
/// Rounding is half-up (`2.5 -> 3`, `-2.5 -> -2`), matching the host.
pub fn to_integer(value: Option<&Value>, fallback: Value) -> Value {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(text)) if !text.trim().is_empty() => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed.filter(|f| f.is_finite()) {
        Some(f) => integer_value((f + 0.5).floor()),
        None => fallback,
    }
}

fn integer_value(rounded: f64) -> Value {
    // `i64::MAX as f64` is 2^63, one past the largest i64.
    if rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Value::from(rounded as i64)
    } else {
        Number::from_f64(rounded).map_or(Value::Null, Value::Number)
    }
}

/// String conversion the host applies to arguments; `null` becomes `""`.
pub fn to_host_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_string(n),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(to_host_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_owned(),
    }
}

/// Like [`to_host_string`], but absent and `null` stay `null`.
pub fn optional_host_string(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null) => Value::Null,
        Some(value) => Value::String(to_host_string(value)),
    }
}

fn number_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}
