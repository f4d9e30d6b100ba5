// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native events adapter: host callback trampolines.
//
// The host raises events by calling global functions with whatever
// arguments it likes. The adapter installs one trampoline per known
// callback name; each invocation becomes an `EventEnvelope` delivered in
// order on the semantic channel, on `native:<callback>`, and on
// `nativeEvent`.

use std::cell::RefCell;
use std::rc::Rc;

use dtunnel_core::json::safe_parse_json;
use dtunnel_core::registry::{NativeCallback, PayloadPolicy, semantic_for_callback};
use dtunnel_core::types::{
    BridgeEvent, EventEnvelope, NATIVE_EVENT_CHANNEL, native_channel, now_millis,
};
use serde_json::Value;
use tracing::debug;

use crate::bus::EventBus;
use crate::host::{CallbackFn, HostBinding, HostScope};

pub struct NativeEventsAdapter {
    host: HostScope,
    bus: EventBus<BridgeEvent>,
    installed: RefCell<Vec<(NativeCallback, CallbackFn)>>,
}

impl NativeEventsAdapter {
    pub fn new(host: HostScope, bus: EventBus<BridgeEvent>) -> Self {
        Self {
            host,
            bus,
            installed: RefCell::new(Vec::new()),
        }
    }

    /// Install a trampoline for every known callback this adapter has not
    /// installed yet. Safe to call repeatedly.
    pub fn register(&self) {
        let mut added = 0usize;
        for callback in NativeCallback::ALL {
            if self.is_installed(callback) {
                continue;
            }
            let bus = self.bus.clone();
            let name = callback.as_str();
            let trampoline: CallbackFn = Rc::new(move |args: &[Value]| dispatch(&bus, name, args));

            self.host
                .set(name, HostBinding::Callback(Rc::clone(&trampoline)));
            self.installed.borrow_mut().push((callback, trampoline));
            added += 1;
        }
        if added > 0 {
            debug!(added, "native event trampolines installed");
        }
    }

    /// Remove the trampolines this adapter installed, leaving alone any
    /// name the host has since rebound to something else.
    pub fn unregister(&self) {
        let installed = std::mem::take(&mut *self.installed.borrow_mut());
        if installed.is_empty() {
            return;
        }
        let mut removed = 0usize;
        for (callback, trampoline) in &installed {
            if self.host.is_bound_to_callback(callback.as_str(), trampoline) {
                self.host.remove(callback.as_str());
                removed += 1;
            }
        }
        debug!(
            removed,
            kept = installed.len() - removed,
            "native event trampolines removed"
        );
    }

    /// Callback names currently installed by this adapter, in installation order.
    pub fn registered_callbacks(&self) -> Vec<&'static str> {
        self.installed
            .borrow()
            .iter()
            .map(|(callback, _)| callback.as_str())
            .collect()
    }

    pub fn is_registered(&self) -> bool {
        !self.installed.borrow().is_empty()
    }

    fn is_installed(&self, callback: NativeCallback) -> bool {
        self.installed
            .borrow()
            .iter()
            .any(|(installed, _)| *installed == callback)
    }
}

/// Translate one host callback invocation and fan it out on `bus`.
///
/// Unknown callback names still reach `native:<name>` and `nativeEvent`
/// with a `None` semantic name.
pub fn dispatch(bus: &EventBus<BridgeEvent>, callback_name: &str, args: &[Value]) {
    let envelope = build_envelope(callback_name, args);
    let semantic = envelope.name;
    let event = BridgeEvent::Native(envelope);

    if let Some(semantic) = semantic {
        bus.emit(semantic.as_str(), &event);
    }
    bus.emit(&native_channel(callback_name), &event);
    bus.emit(NATIVE_EVENT_CHANNEL, &event);
}

fn build_envelope(callback_name: &str, args: &[Value]) -> EventEnvelope {
    let name = semantic_for_callback(callback_name);
    let raw_payload = match args {
        [single] => single.clone(),
        _ => Value::Array(args.to_vec()),
    };
    let payload = match name.map(|event| event.payload_policy()) {
        Some(PayloadPolicy::Json) => safe_parse_json(&raw_payload),
        _ => raw_payload.clone(),
    };

    EventEnvelope {
        name,
        callback_name: callback_name.to_owned(),
        payload,
        raw_payload,
        args: args.to_vec(),
        timestamp: now_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtunnel_core::registry::SemanticEvent;
    use serde_json::json;

    fn record_channels(
        bus: &EventBus<BridgeEvent>,
        channels: &[&str],
    ) -> Rc<RefCell<Vec<(String, EventEnvelope)>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        for channel in channels {
            let sink = Rc::clone(&seen);
            let label = channel.to_string();
            bus.on(channel, move |event| {
                if let Some(envelope) = event.as_envelope() {
                    sink.borrow_mut().push((label.clone(), envelope.clone()));
                }
            });
        }
        seen
    }

    #[test]
    fn register_installs_every_callback_once() {
        let host = HostScope::new();
        let adapter = NativeEventsAdapter::new(host.clone(), EventBus::new());
        adapter.register();
        let first: Vec<CallbackFn> = NativeCallback::ALL
            .iter()
            .filter_map(|cb| host.get(cb.as_str())?.as_callback().cloned())
            .collect();
        assert_eq!(first.len(), 12);

        adapter.register();
        for (callback, trampoline) in NativeCallback::ALL.iter().zip(&first) {
            assert!(host.is_bound_to_callback(callback.as_str(), trampoline));
        }
        assert_eq!(adapter.registered_callbacks().len(), 12);
        assert_eq!(adapter.registered_callbacks()[0], "DtVpnStateEvent");
    }

    #[test]
    fn fan_out_is_semantic_then_native_then_catch_all() {
        let host = HostScope::new();
        let bus = EventBus::new();
        let seen = record_channels(
            &bus,
            &[NATIVE_EVENT_CHANNEL, "native:DtVpnStateEvent", "vpnState"],
        );
        let adapter = NativeEventsAdapter::new(host.clone(), bus);
        adapter.register();

        assert!(host.invoke_callback("DtVpnStateEvent", &[json!("CONNECTED")]));

        let seen = seen.borrow();
        let order: Vec<&str> = seen.iter().map(|(channel, _)| channel.as_str()).collect();
        assert_eq!(order, vec!["vpnState", "native:DtVpnStateEvent", "nativeEvent"]);
        let envelope = &seen[0].1;
        assert_eq!(envelope.name, Some(SemanticEvent::VpnState));
        assert_eq!(envelope.callback_name, "DtVpnStateEvent");
        assert_eq!(envelope.payload, json!("CONNECTED"));
        assert_eq!(envelope.raw_payload, json!("CONNECTED"));
        assert_eq!(envelope.args, vec![json!("CONNECTED")]);
    }

    #[test]
    fn every_callback_fans_out_in_channel_order() {
        for callback in NativeCallback::ALL {
            let host = HostScope::new();
            let bus = EventBus::new();
            let name = callback.as_str();
            let semantic = callback.semantic();
            let native = native_channel(name);
            let seen = record_channels(
                &bus,
                &[NATIVE_EVENT_CHANNEL, native.as_str(), semantic.as_str()],
            );
            let adapter = NativeEventsAdapter::new(host.clone(), bus);
            adapter.register();

            assert!(host.invoke_callback(name, &[json!("x")]), "{name} not bound");

            let seen = seen.borrow();
            let order: Vec<&str> = seen.iter().map(|(channel, _)| channel.as_str()).collect();
            assert_eq!(
                order,
                vec![semantic.as_str(), native.as_str(), NATIVE_EVENT_CHANNEL],
                "{name}"
            );
            for (_, envelope) in seen.iter() {
                assert_eq!(envelope.name, Some(semantic), "{name}");
                assert_eq!(envelope.callback_name, name);
                assert_eq!(envelope.payload, json!("x"), "{name}");
            }
        }
    }

    #[test]
    fn json_policy_decodes_and_tolerates_garbage() {
        let bus = EventBus::new();
        let seen = record_channels(&bus, &["checkUserResult"]);

        dispatch(
            &bus,
            "DtCheckUserResultEvent",
            &[json!(r#"{"username":"ana","expiration_days":"30"}"#)],
        );
        dispatch(&bus, "DtCheckUserResultEvent", &[json!("{broken")]);

        let seen = seen.borrow();
        assert_eq!(
            seen[0].1.payload,
            json!({"username": "ana", "expiration_days": "30"})
        );
        assert_eq!(seen[1].1.payload, json!("{broken"));
        assert_eq!(seen[1].1.raw_payload, json!("{broken"));
    }

    #[test]
    fn raw_policy_never_decodes() {
        let bus = EventBus::new();
        let seen = record_channels(&bus, &["newLog"]);
        dispatch(&bus, "DtNewLogEvent", &[json!(r#"{"looks":"like json"}"#)]);
        assert_eq!(seen.borrow()[0].1.payload, json!(r#"{"looks":"like json"}"#));
    }

    #[test]
    fn variadic_and_empty_arguments_become_arrays() {
        let bus = EventBus::new();
        let seen = record_channels(&bus, &[NATIVE_EVENT_CHANNEL]);

        dispatch(&bus, "DtErrorToastEvent", &[json!("a"), json!(2)]);
        dispatch(&bus, "DtNewDefaultConfigEvent", &[]);

        let seen = seen.borrow();
        assert_eq!(seen[0].1.raw_payload, json!(["a", 2]));
        assert_eq!(seen[0].1.payload, json!(["a", 2]));
        assert_eq!(seen[1].1.raw_payload, json!([]));
        assert!(seen[1].1.args.is_empty());
    }

    #[test]
    fn unknown_callbacks_skip_the_semantic_channel() {
        let bus = EventBus::new();
        let seen = record_channels(&bus, &["native:DtCustomEvent", NATIVE_EVENT_CHANNEL]);
        dispatch(&bus, "DtCustomEvent", &[json!(1)]);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|(_, envelope)| envelope.name.is_none()));
    }

    #[test]
    fn unregister_leaves_foreign_bindings() {
        let host = HostScope::new();
        let adapter = NativeEventsAdapter::new(host.clone(), EventBus::new());
        adapter.unregister();
        assert!(!adapter.is_registered());

        adapter.register();
        host.set_callback("DtNewLogEvent", |_| {});
        adapter.unregister();

        assert!(!adapter.is_registered());
        assert!(!host.contains("DtVpnStateEvent"));
        assert!(matches!(
            host.get("DtNewLogEvent"),
            Some(HostBinding::Callback(_))
        ));

        adapter.register();
        assert!(adapter.is_registered());
    }
}
