// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capability facades: typed wrappers over fixed gateway calls.
//
// Each method maps onto exactly one `(object, method)` pair. Value calls
// return `Ok(Value::Null)` on lenient-mode failures; void calls return
// `Ok(())`. In strict mode the gateway's `BridgeError` comes back as `Err`.

use dtunnel_core::error::BridgeError;
use serde_json::{Value, json};

use crate::gateway::{BridgeGateway, CallOptions};

type CallResult<T> = std::result::Result<T, BridgeError>;

#[derive(Clone, Copy)]
struct ModuleBase<'a> {
    gateway: &'a BridgeGateway,
}

impl ModuleBase<'_> {
    fn call(&self, object: &str, method: &str, args: &[Value]) -> CallResult<Value> {
        self.gateway
            .call(object, method, args, CallOptions::default())
    }

    fn call_json(&self, object: &str, method: &str, args: &[Value]) -> CallResult<Value> {
        self.gateway.call(object, method, args, CallOptions::json())
    }

    fn call_void(&self, object: &str, method: &str, args: &[Value]) -> CallResult<()> {
        self.gateway
            .call(object, method, args, CallOptions::void())
            .map(|_| ())
    }
}

/// Server configuration and credentials.
#[derive(Clone, Copy)]
pub struct ConfigModule<'a> {
    base: ModuleBase<'a>,
}

impl<'a> ConfigModule<'a> {
    pub fn new(gateway: &'a BridgeGateway) -> Self {
        Self {
            base: ModuleBase { gateway },
        }
    }

    pub fn set_config(&self, id: impl Into<Value>) -> CallResult<()> {
        self.base.call_void("DtSetConfig", "execute", &[id.into()])
    }

    pub fn get_configs(&self) -> CallResult<Value> {
        self.base.call_json("DtGetConfigs", "execute", &[])
    }

    pub fn get_default_config(&self) -> CallResult<Value> {
        self.base.call_json("DtGetDefaultConfig", "execute", &[])
    }

    pub fn open_config_dialog(&self) -> CallResult<()> {
        self.base.call_void("DtExecuteDialogConfig", "execute", &[])
    }

    pub fn get_username(&self) -> CallResult<Value> {
        self.base.call("DtUsername", "get", &[])
    }

    pub fn set_username(&self, value: impl Into<Value>) -> CallResult<()> {
        self.base.call_void("DtUsername", "set", &[value.into()])
    }

    pub fn get_password(&self) -> CallResult<Value> {
        self.base.call("DtPassword", "get", &[])
    }

    pub fn set_password(&self, value: impl Into<Value>) -> CallResult<()> {
        self.base.call_void("DtPassword", "set", &[value.into()])
    }

    pub fn get_local_config_version(&self) -> CallResult<Value> {
        self.base.call("DtGetLocalConfigVersion", "execute", &[])
    }

    pub fn get_cdn_count(&self) -> CallResult<Value> {
        self.base.call("DtCDNCount", "execute", &[])
    }

    pub fn get_uuid(&self) -> CallResult<Value> {
        self.base.call("DtUuid", "get", &[])
    }

    pub fn set_uuid(&self, value: impl Into<Value>) -> CallResult<()> {
        self.base.call_void("DtUuid", "set", &[value.into()])
    }
}

/// VPN lifecycle, logs, and device status.
#[derive(Clone, Copy)]
pub struct MainModule<'a> {
    base: ModuleBase<'a>,
}

impl<'a> MainModule<'a> {
    pub fn new(gateway: &'a BridgeGateway) -> Self {
        Self {
            base: ModuleBase { gateway },
        }
    }

    pub fn get_logs(&self) -> CallResult<Value> {
        self.base.call_json("DtGetLogs", "execute", &[])
    }

    pub fn clear_logs(&self) -> CallResult<()> {
        self.base.call_void("DtClearLogs", "execute", &[])
    }

    pub fn start_vpn(&self) -> CallResult<()> {
        self.base.call_void("DtExecuteVpnStart", "execute", &[])
    }

    pub fn stop_vpn(&self) -> CallResult<()> {
        self.base.call_void("DtExecuteVpnStop", "execute", &[])
    }

    pub fn get_vpn_state(&self) -> CallResult<Value> {
        self.base.call("DtGetVpnState", "execute", &[])
    }

    pub fn start_app_update(&self) -> CallResult<()> {
        self.base.call_void("DtStartAppUpdate", "execute", &[])
    }

    pub fn start_check_user(&self) -> CallResult<()> {
        self.base.call_void("DtStartCheckUser", "execute", &[])
    }

    pub fn show_logger_dialog(&self) -> CallResult<()> {
        self.base.call_void("DtShowLoggerDialog", "execute", &[])
    }

    pub fn get_local_ip(&self) -> CallResult<Value> {
        self.base.call("DtGetLocalIP", "execute", &[])
    }

    pub fn activate_airplane_mode(&self) -> CallResult<()> {
        self.base.call_void("DtAirplaneActivate", "execute", &[])
    }

    pub fn deactivate_airplane_mode(&self) -> CallResult<()> {
        self.base.call_void("DtAirplaneDeactivate", "execute", &[])
    }

    pub fn get_airplane_state(&self) -> CallResult<Value> {
        self.base.call("DtAirplaneState", "execute", &[])
    }

    pub fn get_assistant_state(&self) -> CallResult<Value> {
        self.base.call("DtAppIsCurrentAssistant", "execute", &[])
    }

    pub fn is_current_assistant_enabled(&self) -> CallResult<bool> {
        Ok(self.get_assistant_state()? == "ENABLED")
    }

    pub fn show_menu_dialog(&self) -> CallResult<()> {
        self.base.call_void("DtShowMenuDialog", "execute", &[])
    }

    pub fn get_network_name(&self) -> CallResult<Value> {
        self.base.call("DtGetNetworkName", "execute", &[])
    }

    pub fn get_ping_result(&self) -> CallResult<Value> {
        self.base.call("DtGetPingResult", "execute", &[])
    }
}

#[derive(Clone, Copy)]
pub struct TextModule<'a> {
    base: ModuleBase<'a>,
}

impl<'a> TextModule<'a> {
    pub fn new(gateway: &'a BridgeGateway) -> Self {
        Self {
            base: ModuleBase { gateway },
        }
    }

    /// Host translation of a UI label such as `LBL_VPN_CONNECTED`.
    pub fn translate(&self, label: &str) -> CallResult<Value> {
        self.base.call("DtTranslateText", "execute", &[json!(label)])
    }
}

/// App maintenance and system activities.
#[derive(Clone, Copy)]
pub struct AppModule<'a> {
    base: ModuleBase<'a>,
}

impl<'a> AppModule<'a> {
    pub fn new(gateway: &'a BridgeGateway) -> Self {
        Self {
            base: ModuleBase { gateway },
        }
    }

    pub fn clean_app(&self) -> CallResult<()> {
        self.base.call_void("DtCleanApp", "execute", &[])
    }

    pub fn go_to_voice_input_settings(&self) -> CallResult<()> {
        self.base
            .call_void("DtGoToVoiceInputSettings", "execute", &[])
    }

    pub fn get_app_config(&self, name: &str) -> CallResult<Value> {
        self.base.call_json("DtGetAppConfig", "execute", &[json!(name)])
    }

    pub fn ignore_battery_optimizations(&self) -> CallResult<()> {
        self.base
            .call_void("DtIgnoreBatteryOptimizations", "execute", &[])
    }

    pub fn start_apn_activity(&self) -> CallResult<()> {
        self.base.call_void("DtStartApnActivity", "execute", &[])
    }

    pub fn start_network_activity(&self) -> CallResult<()> {
        self.base.call_void("DtStartNetworkActivity", "execute", &[])
    }

    /// With `None` the host receives no argument at all.
    pub fn start_web_view_activity(&self, url: Option<&str>) -> CallResult<()> {
        match url {
            Some(url) => self
                .base
                .call_void("DtStartWebViewActivity", "execute", &[json!(url)]),
            None => self.base.call_void("DtStartWebViewActivity", "execute", &[]),
        }
    }

    pub fn start_radio_info_activity(&self) -> CallResult<()> {
        self.base
            .call_void("DtStartRadioInfoActivity", "execute", &[])
    }
}

/// Android device integration.
#[derive(Clone, Copy)]
pub struct AndroidModule<'a> {
    base: ModuleBase<'a>,
}

impl<'a> AndroidModule<'a> {
    pub fn new(gateway: &'a BridgeGateway) -> Self {
        Self {
            base: ModuleBase { gateway },
        }
    }

    pub fn get_device_id(&self) -> CallResult<Value> {
        self.base.call("DtGetDeviceID", "execute", &[])
    }

    /// A missing or empty image is sent as `null`.
    pub fn send_notification(
        &self,
        title: &str,
        message: &str,
        image_url: Option<&str>,
    ) -> CallResult<()> {
        let image = match image_url {
            Some(url) if !url.is_empty() => json!(url),
            _ => Value::Null,
        };
        self.base.call_void(
            "DtSendNotification",
            "execute",
            &[json!(title), json!(message), image],
        )
    }

    pub fn get_network_data(&self) -> CallResult<Value> {
        self.base.call_json("DtGetNetworkData", "execute", &[])
    }

    pub fn get_status_bar_height(&self) -> CallResult<Value> {
        self.base.call("DtGetStatusBarHeight", "execute", &[])
    }

    pub fn get_navigation_bar_height(&self) -> CallResult<Value> {
        self.base.call("DtGetNavigationBarHeight", "execute", &[])
    }

    pub fn open_external_url(&self, url: &str) -> CallResult<()> {
        self.base
            .call_void("DtOpenExternalUrl", "execute", &[json!(url)])
    }

    /// With `None` the host picks its default port.
    pub fn start_hot_spot_service(&self, port: Option<u16>) -> CallResult<()> {
        match port {
            Some(port) => self
                .base
                .call_void("DtStartHotSpotService", "execute", &[json!(port)]),
            None => self.base.call_void("DtStartHotSpotService", "execute", &[]),
        }
    }

    pub fn stop_hot_spot_service(&self) -> CallResult<()> {
        self.base.call_void("DtStopHotSpotService", "execute", &[])
    }

    pub fn get_hot_spot_status(&self) -> CallResult<Value> {
        self.base.call("DtGetStatusHotSpotService", "execute", &[])
    }

    pub fn is_hot_spot_running(&self) -> CallResult<bool> {
        Ok(self.get_hot_spot_status()? == "RUNNING")
    }

    pub fn get_network_download_bytes(&self) -> CallResult<Value> {
        self.base.call("DtGetNetworkDownloadBytes", "execute", &[])
    }

    pub fn get_network_upload_bytes(&self) -> CallResult<Value> {
        self.base.call("DtGetNetworkUploadBytes", "execute", &[])
    }

    pub fn get_app_version(&self) -> CallResult<Value> {
        self.base.call("DtAppVersion", "execute", &[])
    }

    pub fn handle_action(&self, action: impl Into<Value>) -> CallResult<()> {
        self.base
            .call_void("DtActionHandler", "execute", &[action.into()])
    }

    pub fn close_app(&self) -> CallResult<()> {
        self.base.call_void("DtCloseApp", "execute", &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventBus;
    use crate::host::{HostObject, HostScope};
    use dtunnel_core::error::BridgeErrorCode;
    use dtunnel_core::registry::BRIDGE_OBJECT_NAMES;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(String, String, Vec<Value>)>>>;

    /// Every known object answers every method with `answer` and logs the call.
    fn recording_host(answer: Value) -> (HostScope, Log) {
        let host = HostScope::new();
        let log: Log = Rc::default();
        for name in BRIDGE_OBJECT_NAMES {
            let mut object = HostObject::new();
            for method in ["execute", "get", "set"] {
                let log = Rc::clone(&log);
                let answer = answer.clone();
                object = object.with_method(method, move |args| {
                    log.borrow_mut()
                        .push((name.to_owned(), method.to_owned(), args.to_vec()));
                    Ok(answer.clone())
                });
            }
            host.set_object(name, object);
        }
        (host, log)
    }

    fn last_call(log: &Log) -> (String, String, Vec<Value>) {
        log.borrow().last().cloned().expect("a call was made")
    }

    #[test]
    fn property_objects_use_get_and_set() {
        let (host, log) = recording_host(json!("stored"));
        let gateway = BridgeGateway::new(host, true, EventBus::new());
        let config = ConfigModule::new(&gateway);

        assert_eq!(config.get_username().expect("get"), json!("stored"));
        assert_eq!(last_call(&log), ("DtUsername".into(), "get".into(), vec![]));

        config.set_uuid("abc").expect("set");
        assert_eq!(
            last_call(&log),
            ("DtUuid".into(), "set".into(), vec![json!("abc")])
        );

        config.set_config(101).expect("set config");
        assert_eq!(
            last_call(&log),
            ("DtSetConfig".into(), "execute".into(), vec![json!(101)])
        );
    }

    #[test]
    fn json_calls_decode_and_void_calls_discard() {
        let (host, _log) = recording_host(json!(r#"{"value":"x"}"#));
        let gateway = BridgeGateway::new(host, true, EventBus::new());

        assert_eq!(
            AppModule::new(&gateway)
                .get_app_config("theme")
                .expect("json"),
            json!({"value": "x"})
        );
        assert_eq!(
            MainModule::new(&gateway).get_vpn_state().expect("raw"),
            json!(r#"{"value":"x"}"#)
        );
        MainModule::new(&gateway).start_vpn().expect("void");
    }

    #[test]
    fn optional_arguments_are_omitted_or_nulled() {
        let (host, log) = recording_host(Value::Null);
        let gateway = BridgeGateway::new(host, true, EventBus::new());
        let app = AppModule::new(&gateway);
        let android = AndroidModule::new(&gateway);

        app.start_web_view_activity(None).expect("no url");
        assert!(last_call(&log).2.is_empty());
        app.start_web_view_activity(Some("https://example.com"))
            .expect("url");
        assert_eq!(last_call(&log).2, vec![json!("https://example.com")]);

        android.start_hot_spot_service(None).expect("default port");
        assert!(last_call(&log).2.is_empty());
        android.start_hot_spot_service(Some(8080)).expect("port");
        assert_eq!(last_call(&log).2, vec![json!(8080)]);

        android
            .send_notification("Title", "Body", Some(""))
            .expect("notify");
        assert_eq!(
            last_call(&log),
            (
                "DtSendNotification".into(),
                "execute".into(),
                vec![json!("Title"), json!("Body"), Value::Null]
            )
        );
    }

    #[test]
    fn predicates_compare_host_strings() {
        let (host, _log) = recording_host(json!("ENABLED"));
        let gateway = BridgeGateway::new(host, true, EventBus::new());
        assert!(MainModule::new(&gateway)
            .is_current_assistant_enabled()
            .expect("state"));
        assert!(!AndroidModule::new(&gateway)
            .is_hot_spot_running()
            .expect("status"));
    }

    #[test]
    fn strict_failures_surface_through_facades() {
        let gateway = BridgeGateway::new(HostScope::new(), true, EventBus::new());
        let err = TextModule::new(&gateway)
            .translate("LBL_X")
            .expect_err("no host");
        assert_eq!(err.code, BridgeErrorCode::BridgeObjectNotFound);
        assert_eq!(err.details.object_name, "DtTranslateText");

        let lenient = BridgeGateway::new(HostScope::new(), false, EventBus::new());
        assert!(!AndroidModule::new(&lenient)
            .is_hot_spot_running()
            .expect("lenient"));
        AndroidModule::new(&lenient).close_app().expect("lenient void");
    }
}
