// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Built-in behaviour of each mock bridge object.
//
// Behaviours read and write the state record and, when auto events are
// on, raise the callbacks a real device would fire on its own. State
// borrows never span an emission.

use dtunnel_core::json::{is_truthy, to_json_string_or_null};
use dtunnel_core::registry::SemanticEvent;
use serde_json::{Value, json};

use crate::simulator::Simulator;
use crate::state::{State, config_summary, optional_host_string, to_host_string, to_integer};

/// Run the default behaviour for `object.method`. Unknown pairs answer `null`.
pub(crate) fn run_default(sim: &Simulator, object: &str, method: &str, args: &[Value]) -> Value {
    let arg = move |index: usize| args.get(index);

    match (object, method) {
        // -- Config --
        ("DtSetConfig", "execute") => set_config(sim, arg(0)),
        ("DtGetConfigs", "execute") => json_field(sim, "configs"),
        ("DtGetDefaultConfig", "execute") => json_field(sim, "defaultConfig"),
        ("DtExecuteDialogConfig", "execute") => log_only(sim, "Config dialog opened"),
        ("DtUsername", "get") => field(sim, "username"),
        ("DtUsername", "set") => store_string(sim, "username", arg(0)),
        ("DtPassword", "get") => field(sim, "password"),
        ("DtPassword", "set") => store_string(sim, "password", arg(0)),
        ("DtUuid", "get") => field(sim, "uuid"),
        ("DtUuid", "set") => store_string(sim, "uuid", arg(0)),
        ("DtGetLocalConfigVersion", "execute") => integer_field(sim, "localConfigVersion"),
        ("DtCDNCount", "execute") => integer_field(sim, "cdnCount"),

        // -- Main --
        ("DtGetLogs", "execute") => sim.write_state(|state| {
            to_json_string_or_null(Some(&*ensure_array(state, "logs")))
        }),
        ("DtClearLogs", "execute") => {
            set_field(sim, "logs", json!([]));
            Value::Null
        }
        ("DtExecuteVpnStart", "execute") => set_vpn_state(sim, true),
        ("DtExecuteVpnStop", "execute") => set_vpn_state(sim, false),
        ("DtGetVpnState", "execute") => field(sim, "vpnState"),
        ("DtStartAppUpdate", "execute") => log_only(sim, "App update started (simulated)"),
        ("DtStartCheckUser", "execute") => start_check_user(sim),
        ("DtShowLoggerDialog", "execute") => log_only(sim, "Logger dialog opened (simulated)"),
        ("DtGetLocalIP", "execute") => field(sim, "localIp"),
        ("DtAirplaneActivate", "execute") => {
            set_field(sim, "airplaneState", json!("ACTIVE"));
            Value::Null
        }
        ("DtAirplaneDeactivate", "execute") => {
            set_field(sim, "airplaneState", json!("INACTIVE"));
            Value::Null
        }
        ("DtAirplaneState", "execute") => field(sim, "airplaneState"),
        ("DtAppIsCurrentAssistant", "execute") => field(sim, "assistantState"),
        ("DtShowMenuDialog", "execute") => log_only(sim, "Menu dialog opened (simulated)"),
        ("DtGetNetworkName", "execute") => field(sim, "networkName"),
        ("DtGetPingResult", "execute") => field(sim, "pingResult"),

        // -- Text --
        ("DtTranslateText", "execute") => translate(sim, arg(0)),

        // -- App --
        ("DtCleanApp", "execute") => {
            set_field(sim, "logs", json!([]));
            log_only(sim, "App cleaned (simulated)")
        }
        ("DtGoToVoiceInputSettings", "execute") => {
            log_only(sim, "Voice input settings opened (simulated)")
        }
        ("DtGetAppConfig", "execute") => app_config(sim, arg(0)),
        ("DtIgnoreBatteryOptimizations", "execute") => {
            log_only(sim, "Battery optimizations ignored (simulated)")
        }
        ("DtStartApnActivity", "execute") => log_only(sim, "APN activity started (simulated)"),
        ("DtStartNetworkActivity", "execute") => {
            log_only(sim, "Network activity started (simulated)")
        }
        ("DtStartWebViewActivity", "execute") => {
            set_field(sim, "lastWebViewUrl", optional_host_string(arg(0)));
            Value::Null
        }
        ("DtStartRadioInfoActivity", "execute") => {
            log_only(sim, "Radio info activity started (simulated)")
        }

        // -- Android --
        ("DtGetDeviceID", "execute") => field(sim, "deviceId"),
        ("DtSendNotification", "execute") => send_notification(sim, arg(0), arg(1), arg(2)),
        ("DtGetNetworkData", "execute") => json_field(sim, "networkData"),
        ("DtGetStatusBarHeight", "execute") => integer_field(sim, "statusBarHeight"),
        ("DtGetNavigationBarHeight", "execute") => integer_field(sim, "navigationBarHeight"),
        ("DtOpenExternalUrl", "execute") => {
            set_field(sim, "lastExternalUrl", optional_host_string(arg(0)));
            Value::Null
        }
        ("DtStartHotSpotService", "execute") => start_hot_spot(sim, arg(0)),
        ("DtStopHotSpotService", "execute") => {
            set_field(sim, "hotSpotStatus", json!("STOPPED"));
            Value::Null
        }
        ("DtGetStatusHotSpotService", "execute") => field(sim, "hotSpotStatus"),
        ("DtGetNetworkDownloadBytes", "execute") => integer_field(sim, "networkDownloadBytes"),
        ("DtGetNetworkUploadBytes", "execute") => integer_field(sim, "networkUploadBytes"),
        ("DtAppVersion", "execute") => field(sim, "appVersion"),
        ("DtActionHandler", "execute") => {
            set_field(sim, "lastAction", optional_host_string(arg(0)));
            Value::Null
        }
        ("DtCloseApp", "execute") => {
            set_field(sim, "closed", json!(true));
            Value::Null
        }

        _ => Value::Null,
    }
}

/// Make `state[key]` an array (replacing anything else) and return it.
pub(crate) fn ensure_array<'a>(state: &'a mut State, key: &str) -> &'a mut Value {
    let slot = state.entry(key).or_insert_with(|| json!([]));
    if !slot.is_array() {
        *slot = json!([]);
    }
    slot
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn field(sim: &Simulator, key: &str) -> Value {
    sim.read_state(|state| state.get(key).cloned().unwrap_or(Value::Null))
}

fn json_field(sim: &Simulator, key: &str) -> Value {
    sim.read_state(|state| to_json_string_or_null(state.get(key)))
}

fn integer_field(sim: &Simulator, key: &str) -> Value {
    sim.read_state(|state| to_integer(state.get(key), json!(0)))
}

fn set_field(sim: &Simulator, key: &str, value: Value) {
    sim.write_state(|state| {
        state.insert(key.to_owned(), value);
    });
}

fn store_string(sim: &Simulator, key: &str, value: Option<&Value>) -> Value {
    let text = value.map(to_host_string).unwrap_or_default();
    set_field(sim, key, Value::String(text));
    Value::Null
}

fn log_only(sim: &Simulator, message: &str) -> Value {
    sim.append_log("INFO", message);
    Value::Null
}

// ---------------------------------------------------------------------------
// Behaviours with side effects
// ---------------------------------------------------------------------------

fn set_config(sim: &Simulator, id: Option<&Value>) -> Value {
    let next_id = sim.read_state(|state| {
        let current = state.get("selectedConfigId").cloned().unwrap_or(Value::Null);
        to_integer(id, current)
    });
    sim.write_state(|state| select_config(state, &next_id));
    sim.append_log("INFO", format!("Config selected: {}", to_host_string(&next_id)));
    sim.auto_emit(SemanticEvent::NewDefaultConfig, None);
    Value::Null
}

/// Point `defaultConfig` at the item with `id`. Unknown ids change nothing.
fn select_config(state: &mut State, id: &Value) {
    let Some(Value::Array(categories)) = state.get("configs") else {
        return;
    };
    let found = categories.iter().find_map(|category| {
        let items = category.get("items")?.as_array()?;
        let item = items.iter().find(|item| item.get("id") == Some(id))?;
        Some((category.get("id").cloned(), item.clone()))
    });
    let Some((category_id, item)) = found else {
        return;
    };

    let fallback = state
        .get("defaultConfig")
        .and_then(|config| config.get("category_id"))
        .cloned()
        .unwrap_or(Value::Null);
    let category_id = to_integer(category_id.as_ref(), fallback);
    let selected_id = item.get("id").cloned().unwrap_or(Value::Null);

    state.insert("defaultConfig".into(), config_summary(&item, category_id));
    state.insert("selectedConfigId".into(), selected_id);
}

fn set_vpn_state(sim: &Simulator, connected: bool) -> Value {
    let (vpn_state, message, started) = if connected {
        ("CONNECTED", "VPN started (simulated)", SemanticEvent::VpnStartedSuccess)
    } else {
        ("DISCONNECTED", "VPN stopped (simulated)", SemanticEvent::VpnStoppedSuccess)
    };
    set_field(sim, "vpnState", json!(vpn_state));
    sim.append_log("INFO", message);

    sim.auto_emit(started, None);
    sim.auto_emit(SemanticEvent::VpnState, Some(field(sim, "vpnState")));
    Value::Null
}

fn start_check_user(sim: &Simulator) -> Value {
    sim.append_log("INFO", "Check user started (simulated)");
    if sim.auto_events() {
        sim.emit_event(SemanticEvent::CheckUserStarted, None);
        let result = field(sim, "checkUserResult");
        if is_truthy(&result) {
            sim.emit_event(SemanticEvent::CheckUserResult, Some(result));
        }
    }
    Value::Null
}

fn translate(sim: &Simulator, label: Option<&Value>) -> Value {
    let key = match label {
        None | Some(Value::Null) => return Value::Null,
        Some(label) => to_host_string(label),
    };
    sim.read_state(|state| {
        if let Some(translation) = state
            .get("translations")
            .and_then(|translations| translations.get(&key))
        {
            return translation.clone();
        }
        let prefix = state
            .get("translationPrefix")
            .filter(|prefix| is_truthy(prefix))
            .map(to_host_string)
            .unwrap_or_default();
        Value::String(format!("{prefix}{key}"))
    })
}

fn app_config(sim: &Simulator, name: Option<&Value>) -> Value {
    let key = name
        .filter(|name| is_truthy(name))
        .map(to_host_string)
        .unwrap_or_default();
    sim.read_state(|state| {
        let value = state
            .get("appConfig")
            .and_then(|config| config.get(&key))
            .cloned()
            .unwrap_or(Value::Null);
        to_json_string_or_null(Some(&json!({ "value": value })))
    })
}

fn send_notification(
    sim: &Simulator,
    title: Option<&Value>,
    message: Option<&Value>,
    image: Option<&Value>,
) -> Value {
    let text = |value: Option<&Value>| value.map(to_host_string).unwrap_or_default();
    let notification = json!({
        "title": text(title),
        "message": text(message),
        "image": text(image),
    });

    sim.write_state(|state| {
        state.insert("notification".into(), notification.clone());
        if let Value::Array(history) = ensure_array(state, "notifications") {
            history.push(notification.clone());
        }
    });
    sim.auto_emit(SemanticEvent::Notification, Some(notification));
    Value::Null
}

fn start_hot_spot(sim: &Simulator, port: Option<&Value>) -> Value {
    sim.write_state(|state| {
        state.insert("hotSpotStatus".into(), json!("RUNNING"));
        let next_port = match port {
            None => Value::Null,
            Some(port) => {
                let previous = state.get("hotSpotPort").cloned().unwrap_or(Value::Null);
                to_integer(Some(port), previous)
            }
        };
        state.insert("hotSpotPort".into(), next_port);
    });
    Value::Null
}
