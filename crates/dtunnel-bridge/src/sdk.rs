// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SDK client: the object a page constructs.
//
// One instance owns one event bus, one gateway and one native events
// adapter, all addressing the same host scope. `destroy` tears them down
// together so create/destroy cycles leave no bindings behind.

use std::rc::Rc;

use dtunnel_core::config::SdkConfig;
use dtunnel_core::error::BridgeError;
use dtunnel_core::registry::{BRIDGE_OBJECT_NAMES, SemanticEvent};
use dtunnel_core::types::{
    BridgeEvent, ERROR_CHANNEL, ErrorEvent, EventEnvelope, NATIVE_EVENT_CHANNEL, native_channel,
    now_millis,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::bus::{EventBus, ListenerId, Subscription};
use crate::facades::{AndroidModule, AppModule, ConfigModule, MainModule, TextModule};
use crate::gateway::{BridgeGateway, BridgeLogger, CallOptions, TracingLogger};
use crate::host::{HostBinding, HostScope};
use crate::native_events::NativeEventsAdapter;

/// SDK release this bridge speaks for.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Presence of one known capability object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectAvailability {
    pub object_name: &'static str,
    pub available: bool,
}

/// Point-in-time view of an SDK instance for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugSnapshot {
    pub strict: bool,
    pub auto_register_native_events: bool,
    pub ready: bool,
    pub bridge_availability: Vec<ObjectAvailability>,
    pub registered_native_callbacks: Vec<&'static str>,
    pub timestamp: i64,
}

pub struct Sdk {
    config: SdkConfig,
    host: HostScope,
    bus: EventBus<BridgeEvent>,
    gateway: BridgeGateway,
    native_events: NativeEventsAdapter,
}

impl Sdk {
    pub const VERSION: &'static str = VERSION;

    pub fn new(host: HostScope, config: SdkConfig) -> Self {
        Self::with_logger(host, config, Rc::new(TracingLogger))
    }

    pub fn with_logger(host: HostScope, config: SdkConfig, logger: Rc<dyn BridgeLogger>) -> Self {
        let bus = EventBus::new();
        let gateway = BridgeGateway::with_logger(host.clone(), config.strict, bus.clone(), logger);
        let native_events = NativeEventsAdapter::new(host.clone(), bus.clone());

        let sdk = Self {
            config,
            host,
            bus,
            gateway,
            native_events,
        };
        if config.auto_register_native_events {
            sdk.register_native_event_handlers();
        }
        debug!(
            version = VERSION,
            strict = config.strict,
            "DTunnel SDK initialised"
        );
        sdk
    }

    pub fn strict(&self) -> bool {
        self.config.strict
    }

    pub fn host(&self) -> &HostScope {
        &self.host
    }

    pub fn gateway(&self) -> &BridgeGateway {
        &self.gateway
    }

    pub fn bus(&self) -> &EventBus<BridgeEvent> {
        &self.bus
    }

    // -- Facades --

    pub fn config(&self) -> ConfigModule<'_> {
        ConfigModule::new(&self.gateway)
    }

    pub fn main(&self) -> MainModule<'_> {
        MainModule::new(&self.gateway)
    }

    pub fn text(&self) -> TextModule<'_> {
        TextModule::new(&self.gateway)
    }

    pub fn app(&self) -> AppModule<'_> {
        AppModule::new(&self.gateway)
    }

    pub fn android(&self) -> AndroidModule<'_> {
        AndroidModule::new(&self.gateway)
    }

    // -- Subscriptions --

    pub fn on(
        &self,
        channel: &str,
        listener: impl Fn(&BridgeEvent) + 'static,
    ) -> Subscription<BridgeEvent> {
        self.bus.on(channel, listener)
    }

    pub fn once(
        &self,
        channel: &str,
        listener: impl FnOnce(&BridgeEvent) + 'static,
    ) -> Subscription<BridgeEvent> {
        self.bus.once(channel, listener)
    }

    pub fn off(&self, channel: &str, id: ListenerId) -> bool {
        self.bus.off(channel, id)
    }

    /// Drop listeners on `channel`, or on every channel when `None`.
    pub fn remove_all_listeners(&self, channel: Option<&str>) {
        self.bus.clear(channel);
    }

    /// Envelopes for one semantic event.
    pub fn on_event(
        &self,
        event: SemanticEvent,
        listener: impl Fn(&EventEnvelope) + 'static,
    ) -> Subscription<BridgeEvent> {
        self.on_envelopes(event.as_str(), listener)
    }

    /// Envelopes for one raw host callback, known or not.
    pub fn on_callback(
        &self,
        callback_name: &str,
        listener: impl Fn(&EventEnvelope) + 'static,
    ) -> Subscription<BridgeEvent> {
        self.on_envelopes(&native_channel(callback_name), listener)
    }

    /// Every envelope from every callback.
    pub fn on_native_event(
        &self,
        listener: impl Fn(&EventEnvelope) + 'static,
    ) -> Subscription<BridgeEvent> {
        self.on_envelopes(NATIVE_EVENT_CHANNEL, listener)
    }

    /// Lenient-mode gateway failures.
    pub fn on_error(&self, listener: impl Fn(&ErrorEvent) + 'static) -> Subscription<BridgeEvent> {
        self.bus.on(ERROR_CHANNEL, move |event| {
            if let Some(error) = event.as_error() {
                listener(error);
            }
        })
    }

    fn on_envelopes(
        &self,
        channel: &str,
        listener: impl Fn(&EventEnvelope) + 'static,
    ) -> Subscription<BridgeEvent> {
        self.bus.on(channel, move |event| {
            if let Some(envelope) = event.as_envelope() {
                listener(envelope);
            }
        })
    }

    // -- Introspection --

    pub fn get_bridge_object(&self, object_name: &str) -> Option<HostBinding> {
        self.gateway.get_object(object_name)
    }

    pub fn has_bridge_object(&self, object_name: &str) -> bool {
        self.gateway.has_object(object_name)
    }

    /// Every known object name with its presence flag, in registry order.
    pub fn bridge_availability(&self) -> Vec<ObjectAvailability> {
        BRIDGE_OBJECT_NAMES
            .iter()
            .map(|&object_name| ObjectAvailability {
                object_name,
                available: self.has_bridge_object(object_name),
            })
            .collect()
    }

    /// Whether all `required` objects are present. An empty slice checks
    /// every known object.
    pub fn is_ready(&self, required: &[&str]) -> bool {
        let targets: &[&str] = if required.is_empty() {
            &BRIDGE_OBJECT_NAMES
        } else {
            required
        };
        targets.iter().all(|name| self.has_bridge_object(name))
    }

    // -- Raw calls --

    pub fn call(
        &self,
        object_name: &str,
        method_name: &str,
        args: &[Value],
    ) -> Result<Value, BridgeError> {
        self.gateway
            .call(object_name, method_name, args, CallOptions::default())
    }

    pub fn call_json(
        &self,
        object_name: &str,
        method_name: &str,
        args: &[Value],
    ) -> Result<Value, BridgeError> {
        self.gateway
            .call(object_name, method_name, args, CallOptions::json())
    }

    pub fn call_void(
        &self,
        object_name: &str,
        method_name: &str,
        args: &[Value],
    ) -> Result<(), BridgeError> {
        self.gateway
            .call(object_name, method_name, args, CallOptions::void())
            .map(|_| ())
    }

    // -- Lifecycle --

    pub fn register_native_event_handlers(&self) -> &Self {
        self.native_events.register();
        self
    }

    pub fn unregister_native_event_handlers(&self) -> &Self {
        self.native_events.unregister();
        self
    }

    pub fn registered_native_callbacks(&self) -> Vec<&'static str> {
        self.native_events.registered_callbacks()
    }

    pub fn debug_snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            strict: self.config.strict,
            auto_register_native_events: self.config.auto_register_native_events,
            ready: self.is_ready(&[]),
            bridge_availability: self.bridge_availability(),
            registered_native_callbacks: self.registered_native_callbacks(),
            timestamp: now_millis(),
        }
    }

    /// Remove this instance's trampolines and every listener.
    pub fn destroy(&self) {
        self.unregister_native_event_handlers();
        self.remove_all_listeners(None);
        debug!("DTunnel SDK destroyed");
    }
}

impl std::fmt::Debug for Sdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sdk")
            .field("config", &self.config)
            .field("channels", &self.bus.channels())
            .field("registered", &self.native_events.is_registered())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostObject;
    use dtunnel_core::error::BridgeErrorCode;
    use dtunnel_core::registry::NativeCallback;
    use serde_json::json;
    use std::cell::RefCell;

    fn vpn_host() -> HostScope {
        let host = HostScope::new();
        host.set_object(
            "DtGetVpnState",
            HostObject::new().with_method("execute", |_| Ok(json!("DISCONNECTED"))),
        );
        host.set_object(
            "DtExecuteVpnStart",
            HostObject::new().with_method("execute", |_| Ok(Value::Null)),
        );
        host
    }

    #[test]
    fn version_matches_release() {
        assert_eq!(Sdk::VERSION, "1.1.5");
    }

    #[test]
    fn construction_registers_trampolines_unless_disabled() {
        let host = HostScope::new();
        let sdk = Sdk::new(host.clone(), SdkConfig::default());
        assert_eq!(sdk.registered_native_callbacks().len(), 12);
        for callback in NativeCallback::ALL {
            assert!(host.get(callback.as_str()).is_some());
        }

        let quiet_host = HostScope::new();
        let quiet = Sdk::new(
            quiet_host.clone(),
            SdkConfig {
                auto_register_native_events: false,
                ..SdkConfig::default()
            },
        );
        assert!(quiet.registered_native_callbacks().is_empty());
        assert!(quiet_host.names().is_empty());
        quiet.register_native_event_handlers();
        assert_eq!(quiet_host.names().len(), 12);
    }

    #[test]
    fn typed_subscriptions_receive_envelopes() {
        let host = HostScope::new();
        let sdk = Sdk::new(host.clone(), SdkConfig::default());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        sdk.on_event(SemanticEvent::ShowSuccessToast, move |envelope| {
            sink.borrow_mut().push(format!("event:{}", envelope.payload));
        });
        let sink = Rc::clone(&seen);
        sdk.on_callback("DtSuccessToastEvent", move |envelope| {
            sink.borrow_mut().push(format!("callback:{}", envelope.callback_name));
        });
        let sink = Rc::clone(&seen);
        sdk.on_native_event(move |_| sink.borrow_mut().push("native".into()));

        host.invoke_callback("DtSuccessToastEvent", &[json!("saved")]);
        assert_eq!(
            *seen.borrow(),
            vec![
                r#"event:"saved""#.to_string(),
                "callback:DtSuccessToastEvent".to_string(),
                "native".to_string(),
            ]
        );
    }

    #[test]
    fn lenient_failures_reach_on_error() {
        let sdk = Sdk::new(HostScope::new(), SdkConfig::default());
        let codes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&codes);
        sdk.on_error(move |event| sink.borrow_mut().push(event.error.code));

        assert_eq!(sdk.main().get_vpn_state().expect("lenient"), Value::Null);
        sdk.call_void("DtGetVpnState", "missing", &[]).expect("lenient");
        assert_eq!(
            *codes.borrow(),
            vec![
                BridgeErrorCode::BridgeObjectNotFound,
                BridgeErrorCode::BridgeObjectNotFound
            ]
        );
    }

    #[test]
    fn strict_sdk_raises() {
        let sdk = Sdk::new(vpn_host(), SdkConfig::strict());
        assert!(sdk.strict());
        assert_eq!(sdk.call("DtGetVpnState", "execute", &[]).expect("ok"), json!("DISCONNECTED"));
        let err = sdk
            .call_json("DtGetVpnState", "get", &[])
            .expect_err("no get method");
        assert_eq!(err.code, BridgeErrorCode::BridgeMethodNotFound);
    }

    #[test]
    fn readiness_and_availability() {
        let sdk = Sdk::new(vpn_host(), SdkConfig::default());
        assert!(sdk.is_ready(&["DtGetVpnState", "DtExecuteVpnStart"]));
        assert!(!sdk.is_ready(&["DtGetVpnState", "DtGetLogs"]));
        assert!(!sdk.is_ready(&[]));

        let availability = sdk.bridge_availability();
        assert_eq!(availability.len(), BRIDGE_OBJECT_NAMES.len());
        assert_eq!(availability[0].object_name, "DtSetConfig");
        let present: Vec<_> = availability
            .iter()
            .filter(|entry| entry.available)
            .map(|entry| entry.object_name)
            .collect();
        assert_eq!(present, vec!["DtExecuteVpnStart", "DtGetVpnState"]);
    }

    #[test]
    fn debug_snapshot_serializes_camel_case() {
        let sdk = Sdk::new(vpn_host(), SdkConfig::default());
        let snapshot = serde_json::to_value(sdk.debug_snapshot()).expect("encode");
        assert_eq!(snapshot["strict"], json!(false));
        assert_eq!(snapshot["autoRegisterNativeEvents"], json!(true));
        assert_eq!(snapshot["ready"], json!(false));
        assert_eq!(snapshot["registeredNativeCallbacks"][0], json!("DtVpnStateEvent"));
        assert_eq!(
            snapshot["bridgeAvailability"][13],
            json!({"objectName": "DtGetVpnState", "available": true})
        );
        assert!(snapshot["timestamp"].as_i64().is_some());
    }

    #[test]
    fn destroy_releases_bindings_and_listeners() {
        let host = HostScope::new();
        for _ in 0..3 {
            let sdk = Sdk::new(host.clone(), SdkConfig::default());
            sdk.on_native_event(|_| {});
            sdk.once("vpnState", |_| {});
            sdk.destroy();
            assert!(sdk.bus().channels().is_empty());
            assert!(sdk.registered_native_callbacks().is_empty());
        }
        assert!(host.names().is_empty());
    }

    #[test]
    fn off_removes_by_id() {
        let sdk = Sdk::new(HostScope::new(), SdkConfig::default());
        let subscription = sdk.on("vpnState", |_| {});
        assert!(sdk.off("vpnState", subscription.id()));
        assert!(!sdk.off("vpnState", subscription.id()));
    }
}
