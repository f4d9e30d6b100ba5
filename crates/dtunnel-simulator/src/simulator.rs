// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host simulator: a mock capability object for every known bridge name.
//
// All mock methods funnel through `Simulator::run_call`: an override for
// `(object, method)` wins, otherwise the built-in behaviour runs against
// the shared state record. Every successful invocation lands in the call
// log. Borrows of state, overrides and the log are released before any
// host callback fires, so listeners may call straight back into the
// simulator.
//
// Installed mocks own the simulator core, so they keep working after every
// `Simulator` handle is gone. The core reaches the host and its installed
// mocks only through weak handles, leaving the host table as the sole owner.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use chrono::{SecondsFormat, Utc};
use dtunnel_bridge::host::{CapabilityObject, HostBinding, HostResult, HostScope, WeakHostScope};
use dtunnel_core::error::HostFault;
use dtunnel_core::json::to_json_string_or_null;
use dtunnel_core::registry::{
    BRIDGE_OBJECT_NAMES, NativeCallback, PROPERTY_OBJECT_NAMES, PayloadPolicy, SemanticEvent,
};
use dtunnel_core::types::now_millis;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, trace, warn};

use crate::behaviors;
use crate::options::SimulatorOptions;
use crate::state::{State, default_state, merge_deep};

/// Override body. Receives the controller so it can emit or touch state.
pub type ImplementationFn = Rc<dyn Fn(&Simulator, &[Value]) -> HostResult>;

/// Replacement for a built-in mock method.
#[derive(Clone)]
pub enum Implementation {
    Function(ImplementationFn),
    /// Fixed result; each call returns its own copy.
    Value(Value),
}

impl Implementation {
    pub fn function(body: impl Fn(&Simulator, &[Value]) -> HostResult + 'static) -> Self {
        Self::Function(Rc::new(body))
    }
}

impl From<Value> for Implementation {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl std::fmt::Debug for Implementation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// One simulated invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    pub object_name: String,
    pub method_name: String,
    pub args: Vec<Value>,
    pub result: Value,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Execute,
    GetSet,
}

/// Mock bound on the host under one bridge name.
struct MockObject {
    core: Rc<SimCore>,
    name: &'static str,
    shape: Shape,
}

impl CapabilityObject for MockObject {
    fn has_method(&self, method: &str) -> bool {
        match self.shape {
            Shape::Execute => method == "execute",
            Shape::GetSet => method == "get" || method == "set",
        }
    }

    fn invoke(&self, method: &str, args: &[Value]) -> HostResult {
        let Some(host) = self.core.host.upgrade() else {
            return Err(HostFault::new(format!("{}: host no longer exists", self.name)));
        };
        let simulator = Simulator {
            inner: Rc::clone(&self.core),
            host,
        };
        match (self.shape, method) {
            (Shape::Execute, "execute") => simulator.run_call(self.name, method, args),
            (Shape::GetSet, "get") => simulator.run_call(self.name, method, &[]),
            (Shape::GetSet, "set") => {
                let value = args.first().cloned().unwrap_or(Value::Null);
                simulator.run_call(self.name, method, &[value])
            }
            _ => Err(HostFault::new(format!("{method} is not a function"))),
        }
    }
}

struct SimCore {
    host: WeakHostScope,
    auto_events: bool,
    allow_in_webview: bool,
    state: RefCell<State>,
    calls: RefCell<Vec<CallRecord>>,
    implementations: RefCell<HashMap<String, Implementation>>,
    /// Prior bindings captured at install; `None` means no such property.
    previous: RefCell<Vec<(&'static str, Option<HostBinding>)>>,
    installed: Cell<bool>,
    blocked_by_webview: Cell<bool>,
    /// Mocks bound by the current install; the host table owns them.
    installed_objects: RefCell<Vec<(&'static str, Weak<dyn CapabilityObject>)>>,
}

/// Controller for one simulated host. Clones share the same simulator.
#[derive(Clone)]
pub struct Simulator {
    inner: Rc<SimCore>,
    host: HostScope,
}

/// Create a simulator and install it immediately.
pub fn install_simulator(host: HostScope, options: SimulatorOptions) -> Simulator {
    let simulator = Simulator::new(host, options);
    simulator.install();
    simulator
}

fn override_key(object_name: &str, method_name: &str) -> String {
    format!("{object_name}.{method_name}")
}

impl Simulator {
    pub fn new(host: HostScope, options: SimulatorOptions) -> Self {
        let mut state = default_state();
        if let Some(patch) = &options.state {
            merge_deep(&mut state, patch);
        }

        let inner = Rc::new(SimCore {
            host: host.downgrade(),
            auto_events: options.auto_events,
            allow_in_webview: options.allow_in_webview,
            state: RefCell::new(state),
            calls: RefCell::new(Vec::new()),
            implementations: RefCell::new(HashMap::new()),
            previous: RefCell::new(Vec::new()),
            installed: Cell::new(false),
            blocked_by_webview: Cell::new(false),
            installed_objects: RefCell::new(Vec::new()),
        });
        Self { inner, host }
    }

    // -- Accessors --

    pub fn host(&self) -> &HostScope {
        &self.host
    }

    pub fn bridge_object_names(&self) -> &'static [&'static str] {
        &BRIDGE_OBJECT_NAMES
    }

    pub fn callback_names(&self) -> Vec<&'static str> {
        NativeCallback::ALL.iter().map(NativeCallback::as_str).collect()
    }

    /// Semantic event name to the host callback that raises it.
    pub fn semantic_event_to_callback(&self) -> Vec<(&'static str, &'static str)> {
        SemanticEvent::ALL
            .iter()
            .map(|event| (event.as_str(), event.callback().as_str()))
            .collect()
    }

    pub fn auto_events(&self) -> bool {
        self.inner.auto_events
    }

    pub fn allow_in_webview(&self) -> bool {
        self.inner.allow_in_webview
    }

    /// This simulator's mock for `object_name`.
    ///
    /// While installed this is the object bound on the host; otherwise a
    /// fresh mock backed by the same state. Unknown names give `None`.
    pub fn bridge_object(&self, object_name: &str) -> Option<Rc<dyn CapabilityObject>> {
        let name = *BRIDGE_OBJECT_NAMES.iter().find(|&&name| name == object_name)?;
        Some(self.installed_object(name).unwrap_or_else(|| self.detached_mock(name)))
    }

    fn installed_object(&self, object_name: &str) -> Option<Rc<dyn CapabilityObject>> {
        self.inner
            .installed_objects
            .borrow()
            .iter()
            .find(|(name, _)| *name == object_name)
            .and_then(|(_, object)| object.upgrade())
    }

    fn detached_mock(&self, name: &'static str) -> Rc<dyn CapabilityObject> {
        let shape = if PROPERTY_OBJECT_NAMES.contains(&name) {
            Shape::GetSet
        } else {
            Shape::Execute
        };
        Rc::new(MockObject {
            core: Rc::clone(&self.inner),
            name,
            shape,
        })
    }

    // -- Install --

    /// Bind every mock on the host, remembering what was there.
    ///
    /// Refused (and [`is_blocked_by_webview`](Self::is_blocked_by_webview)
    /// set) when any bridge name already holds a non-null value that is not
    /// this simulator's mock, unless `allow_in_webview` was set.
    pub fn install(&self) -> &Self {
        let core = &self.inner;
        if core.installed.get() {
            return self;
        }
        core.blocked_by_webview.set(false);

        if !core.allow_in_webview {
            if let Some(name) = self.external_bridge_name() {
                core.blocked_by_webview.set(true);
                warn!(object = name, "host already exposes a bridge; simulator not installed");
                return self;
            }
        }

        let mut previous = core.previous.borrow_mut();
        let mut installed = core.installed_objects.borrow_mut();
        for &name in BRIDGE_OBJECT_NAMES.iter() {
            let object = self.detached_mock(name);
            let prior = self.host.set(name, HostBinding::Object(Rc::clone(&object)));
            previous.push((name, prior));
            installed.push((name, Rc::downgrade(&object)));
        }
        core.installed.set(true);
        debug!(objects = installed.len(), "simulator installed");
        self
    }

    /// Restore the bindings seen at install, skipping any name the host has
    /// since rebound.
    pub fn uninstall(&self) -> &Self {
        let core = &self.inner;
        if !core.installed.get() {
            return self;
        }

        let previous = std::mem::take(&mut *core.previous.borrow_mut());
        for (name, prior) in previous {
            let still_ours = self
                .installed_object(name)
                .is_some_and(|object| self.host.is_bound_to_object(name, &object));
            if !still_ours {
                continue;
            }
            match prior {
                Some(binding) => {
                    self.host.set(name, binding);
                }
                None => {
                    self.host.remove(name);
                }
            }
        }
        core.installed_objects.borrow_mut().clear();

        core.installed.set(false);
        core.blocked_by_webview.set(false);
        debug!("simulator uninstalled");
        self
    }

    pub fn is_installed(&self) -> bool {
        self.inner.installed.get()
    }

    pub fn is_blocked_by_webview(&self) -> bool {
        self.inner.blocked_by_webview.get()
    }

    fn external_bridge_name(&self) -> Option<&'static str> {
        BRIDGE_OBJECT_NAMES.iter().copied().find(|&name| {
            let Some(binding) = self.host.get(name) else {
                return false;
            };
            let ours = self
                .installed_object(name)
                .is_some_and(|object| self.host.is_bound_to_object(name, &object));
            !binding.is_null() && !ours
        })
    }

    // -- State --

    /// Deep copy of the current state.
    pub fn state(&self) -> Value {
        Value::Object(self.inner.state.borrow().clone())
    }

    /// Merge `patch` over the current state.
    pub fn set_state(&self, patch: &Value) -> &Self {
        merge_deep(&mut self.inner.state.borrow_mut(), patch);
        self
    }

    /// Return to the baseline, then merge `patch` if given.
    pub fn reset_state(&self, patch: Option<&Value>) -> &Self {
        let mut state = default_state();
        if let Some(patch) = patch {
            merge_deep(&mut state, patch);
        }
        *self.inner.state.borrow_mut() = state;
        self
    }

    pub(crate) fn read_state<R>(&self, read: impl FnOnce(&State) -> R) -> R {
        read(&self.inner.state.borrow())
    }

    pub(crate) fn write_state<R>(&self, write: impl FnOnce(&mut State) -> R) -> R {
        write(&mut self.inner.state.borrow_mut())
    }

    /// Append a line to the simulated device log.
    pub(crate) fn append_log(&self, level: &str, message: impl Into<String>) {
        let entry = json!({
            "level": level,
            "message": message.into(),
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        self.write_state(|state| {
            if let Value::Array(logs) = behaviors::ensure_array(state, "logs") {
                logs.push(entry);
            }
        });
    }

    // -- Call log --

    /// Deep copy of every recorded invocation, oldest first.
    pub fn calls(&self) -> Vec<CallRecord> {
        self.inner.calls.borrow().clone()
    }

    pub fn clear_calls(&self) -> &Self {
        self.inner.calls.borrow_mut().clear();
        self
    }

    // -- Overrides --

    /// Replace the built-in behaviour of `object_name.method_name`.
    ///
    /// Empty names are ignored.
    pub fn set_implementation(
        &self,
        object_name: &str,
        method_name: &str,
        implementation: impl Into<Implementation>,
    ) -> &Self {
        if object_name.is_empty() || method_name.is_empty() {
            return self;
        }
        self.inner
            .implementations
            .borrow_mut()
            .insert(override_key(object_name, method_name), implementation.into());
        self
    }

    pub fn remove_implementation(&self, object_name: &str, method_name: &str) -> &Self {
        self.inner
            .implementations
            .borrow_mut()
            .remove(&override_key(object_name, method_name));
        self
    }

    pub fn clear_implementations(&self) -> &Self {
        self.inner.implementations.borrow_mut().clear();
        self
    }

    fn run_call(&self, object_name: &str, method_name: &str, args: &[Value]) -> HostResult {
        let implementation = self
            .inner
            .implementations
            .borrow()
            .get(&override_key(object_name, method_name))
            .cloned();

        let result = match implementation {
            Some(Implementation::Function(body)) => body(self, args)?,
            Some(Implementation::Value(value)) => value,
            None => behaviors::run_default(self, object_name, method_name, args),
        };
        trace!(object = object_name, method = method_name, "simulated call");

        self.inner.calls.borrow_mut().push(CallRecord {
            object_name: object_name.to_owned(),
            method_name: method_name.to_owned(),
            args: args.to_vec(),
            result: result.clone(),
            timestamp: now_millis(),
        });
        Ok(result)
    }

    // -- Events --

    /// Raise a host callback.
    ///
    /// A semantic event name is translated to its callback, with the first
    /// argument as payload. Any other name is invoked directly with `args`.
    /// Returns whether a callback was bound under the resolved name.
    pub fn emit(&self, name: &str, args: &[Value]) -> bool {
        match SemanticEvent::from_name(name) {
            Some(event) => self.emit_event(event, args.first().cloned()),
            None => self.host.invoke_callback(name, args),
        }
    }

    /// Raise `event` the way the host would: JSON-policy events receive
    /// their payload as JSON text, others receive it as-is or no argument.
    pub fn emit_event(&self, event: SemanticEvent, payload: Option<Value>) -> bool {
        let callback = event.callback().as_str();
        let args = match (event.payload_policy(), payload) {
            (PayloadPolicy::Json, payload) => vec![to_json_string_or_null(payload.as_ref())],
            (PayloadPolicy::Raw, Some(payload)) => vec![payload],
            (PayloadPolicy::Raw, None) => Vec::new(),
        };
        self.host.invoke_callback(callback, &args)
    }

    /// `emit_event` gated on `auto_events`.
    pub(crate) fn auto_emit(&self, event: SemanticEvent, payload: Option<Value>) {
        if self.inner.auto_events {
            self.emit_event(event, payload);
        }
    }
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("installed", &self.is_installed())
            .field("blocked_by_webview", &self.is_blocked_by_webview())
            .field("auto_events", &self.inner.auto_events)
            .field("calls", &self.inner.calls.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtunnel_bridge::host::HostObject;

    fn quiet_options() -> SimulatorOptions {
        SimulatorOptions {
            auto_events: false,
            ..SimulatorOptions::default()
        }
    }

    #[test]
    fn install_binds_every_object_and_uninstall_restores() {
        let host = HostScope::new();
        host.set_value("DtCloseApp", Value::Null);
        let simulator = Simulator::new(host.clone(), SimulatorOptions::default());

        simulator.install();
        assert!(simulator.is_installed());
        assert!(!simulator.is_blocked_by_webview());
        for name in BRIDGE_OBJECT_NAMES {
            let ours = simulator.bridge_object(name).expect("mock exists");
            assert!(host.is_bound_to_object(name, &ours), "{name} not bound");
        }

        simulator.uninstall();
        assert!(!simulator.is_installed());
        assert!(matches!(host.get("DtCloseApp"), Some(HostBinding::Value(Value::Null))));
        assert_eq!(host.names(), vec!["DtCloseApp".to_string()]);
    }

    #[test]
    fn install_and_uninstall_are_idempotent() {
        let host = HostScope::new();
        let simulator = Simulator::new(host.clone(), SimulatorOptions::default());
        simulator.uninstall();
        assert!(host.names().is_empty());

        simulator.install().install();
        simulator.uninstall().uninstall();
        assert!(host.names().is_empty());
    }

    #[test]
    fn foreign_binding_blocks_install() {
        let host = HostScope::new();
        host.set_object("DtGetVpnState", HostObject::new());
        let simulator = Simulator::new(host.clone(), SimulatorOptions::default());

        simulator.install();
        assert!(!simulator.is_installed());
        assert!(simulator.is_blocked_by_webview());
        assert_eq!(host.names(), vec!["DtGetVpnState".to_string()]);

        host.set_value("DtGetVpnState", json!(false));
        simulator.install();
        assert!(simulator.is_blocked_by_webview(), "unrelated values still block");
    }

    #[test]
    fn allow_in_webview_shadows_and_then_restores() {
        let host = HostScope::new();
        let real: Rc<dyn CapabilityObject> = Rc::new(HostObject::new());
        host.set("DtGetVpnState", HostBinding::Object(Rc::clone(&real)));
        let simulator = install_simulator(
            host.clone(),
            SimulatorOptions {
                allow_in_webview: true,
                ..SimulatorOptions::default()
            },
        );
        assert!(simulator.is_installed());
        assert!(!host.is_bound_to_object("DtGetVpnState", &real));

        simulator.uninstall();
        assert!(host.is_bound_to_object("DtGetVpnState", &real));
        assert!(!host.contains("DtGetLogs"));
    }

    #[test]
    fn uninstall_skips_names_rebound_since_install() {
        let host = HostScope::new();
        let simulator = install_simulator(host.clone(), SimulatorOptions::default());
        host.set_value("DtAppVersion", json!("replaced"));

        simulator.uninstall();
        assert!(matches!(
            host.get("DtAppVersion"),
            Some(HostBinding::Value(v)) if v == json!("replaced")
        ));
        assert_eq!(host.names().len(), 1);
    }

    #[test]
    fn property_objects_record_normalised_args() {
        let simulator = Simulator::new(HostScope::new(), quiet_options());
        let username = simulator.bridge_object("DtUsername").expect("mock");
        assert!(username.has_method("get"));
        assert!(!username.has_method("execute"));

        username.invoke("get", &[json!("ignored")]).expect("get");
        username.invoke("set", &[]).expect("set");

        let calls = simulator.calls();
        assert_eq!(calls[0].args, Vec::<Value>::new());
        assert_eq!(calls[0].result, json!("dtunnel-user"));
        assert_eq!(calls[1].args, vec![Value::Null]);
        assert_eq!(simulator.state()["username"], json!(""));
    }

    #[test]
    fn overrides_take_precedence_and_are_recorded() {
        let simulator = Simulator::new(HostScope::new(), quiet_options());
        simulator
            .set_implementation("DtGetVpnState", "execute", json!({"fixed": true}))
            .set_implementation(
                "DtGetLocalIP",
                "execute",
                Implementation::function(|sim, args| {
                    sim.set_state(&json!({"localIp": args.first().cloned()}));
                    Ok(json!("via override"))
                }),
            );

        let vpn = simulator.bridge_object("DtGetVpnState").expect("mock");
        let ip = simulator.bridge_object("DtGetLocalIP").expect("mock");
        assert_eq!(vpn.invoke("execute", &[]).expect("value"), json!({"fixed": true}));
        assert_eq!(
            ip.invoke("execute", &[json!("10.0.0.9")]).expect("function"),
            json!("via override")
        );
        assert_eq!(simulator.state()["localIp"], json!("10.0.0.9"));
        assert_eq!(simulator.calls().len(), 2);

        simulator.remove_implementation("DtGetVpnState", "execute");
        assert_eq!(vpn.invoke("execute", &[]).expect("default"), json!("DISCONNECTED"));
        simulator.clear_implementations();
        assert_eq!(ip.invoke("execute", &[]).expect("default"), json!("10.0.0.9"));
    }

    #[test]
    fn failing_override_propagates_and_is_not_recorded() {
        let simulator = Simulator::new(HostScope::new(), quiet_options());
        simulator.set_implementation(
            "DtTranslateText",
            "execute",
            Implementation::function(|_, _| Err(HostFault::new("translation service down"))),
        );
        let translate = simulator.bridge_object("DtTranslateText").expect("mock");
        let fault = translate
            .invoke("execute", &[json!("LBL_X")])
            .expect_err("override fails");
        assert_eq!(fault.message, "translation service down");
        assert!(simulator.calls().is_empty());
    }

    #[test]
    fn snapshots_are_detached_copies() {
        let simulator = Simulator::new(HostScope::new(), quiet_options());
        let mut snapshot = simulator.state();
        snapshot["vpnState"] = json!("HACKED");
        assert_eq!(simulator.state()["vpnState"], json!("DISCONNECTED"));

        let start = simulator.bridge_object("DtExecuteVpnStart").expect("mock");
        start.invoke("execute", &[]).expect("start");
        let mut calls = simulator.calls();
        calls[0].args.push(json!("tampered"));
        assert!(simulator.calls()[0].args.is_empty());
        simulator.clear_calls();
        assert!(simulator.calls().is_empty());
    }

    #[test]
    fn set_and_reset_state_merge() {
        let simulator = Simulator::new(
            HostScope::new(),
            SimulatorOptions {
                state: Some(json!({"vpnState": "CONNECTED"})),
                ..quiet_options()
            },
        );
        assert_eq!(simulator.state()["vpnState"], json!("CONNECTED"));

        simulator.set_state(&json!({"networkData": {"type": "WIFI"}, "logs": [1]}));
        let state = simulator.state();
        assert_eq!(state["networkData"]["type"], json!("WIFI"));
        assert_eq!(state["networkData"]["type_name"], json!("WIFI"));
        assert_eq!(state["logs"], json!([1]));

        simulator.reset_state(Some(&json!({"cdnCount": 9})));
        let state = simulator.state();
        assert_eq!(state["vpnState"], json!("DISCONNECTED"));
        assert_eq!(state["cdnCount"], json!(9));
        assert_eq!(state["logs"], json!([]));
    }

    #[test]
    fn emit_translates_semantic_names() {
        let host = HostScope::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for callback in ["DtNotificationEvent", "DtVpnStartedSuccessEvent", "DtCustomEvent"] {
            let sink = Rc::clone(&seen);
            host.set_callback(callback, move |args: &[Value]| {
                sink.borrow_mut().push((callback, args.to_vec()));
            });
        }
        let simulator = Simulator::new(host, quiet_options());

        assert!(simulator.emit("notification", &[json!({"title": "t"})]));
        assert!(simulator.emit("vpnStartedSuccess", &[]));
        assert!(simulator.emit("DtCustomEvent", &[json!(1), json!(2)]));
        assert!(!simulator.emit("vpnState", &[json!("CONNECTED")]));
        assert!(!simulator.emit("DtUnboundEvent", &[]));
        assert!(simulator.emit_event(SemanticEvent::Notification, None));

        let seen = seen.borrow();
        assert_eq!(seen[0], ("DtNotificationEvent", vec![json!(r#"{"title":"t"}"#)]));
        assert_eq!(seen[1], ("DtVpnStartedSuccessEvent", vec![]));
        assert_eq!(seen[2], ("DtCustomEvent", vec![json!(1), json!(2)]));
        assert_eq!(seen[3], ("DtNotificationEvent", vec![Value::Null]));
    }

    #[test]
    fn installed_mocks_keep_working_after_the_controller_drops() {
        let host = HostScope::new();
        drop(install_simulator(host.clone(), quiet_options()));

        let binding = host.get("DtExecuteVpnStart").expect("still bound");
        let start = binding.as_object().expect("mock object");
        start.invoke("execute", &[]).expect("start");

        let binding = host.get("DtGetVpnState").expect("still bound");
        let state = binding.as_object().expect("mock object");
        assert_eq!(state.invoke("execute", &[]).expect("state"), json!("CONNECTED"));
    }

    #[test]
    fn host_table_is_the_only_owner_of_an_installed_simulator() {
        let host = HostScope::new();
        let simulator = install_simulator(host.clone(), quiet_options());
        let core = Rc::downgrade(&simulator.inner);

        drop(simulator);
        assert!(core.upgrade().is_some());
        drop(host);
        assert!(core.upgrade().is_none());
    }

    #[test]
    fn detached_mock_fails_once_the_host_is_gone() {
        let host = HostScope::new();
        let simulator = Simulator::new(host.clone(), quiet_options());
        let object = simulator.bridge_object("DtGetVpnState").expect("mock");
        drop(simulator);
        drop(host);
        let fault = object.invoke("execute", &[]).expect_err("host dropped");
        assert!(fault.message.contains("host no longer exists"));
    }

    #[test]
    fn reinstall_binds_fresh_mocks_sharing_state() {
        let host = HostScope::new();
        let simulator = install_simulator(host.clone(), quiet_options());
        let first = simulator.bridge_object("DtExecuteVpnStart").expect("mock");
        first.invoke("execute", &[]).expect("start");

        simulator.uninstall().install();
        assert!(simulator.is_installed());
        let second = simulator.bridge_object("DtExecuteVpnStart").expect("mock");
        assert!(host.is_bound_to_object("DtExecuteVpnStart", &second));
        assert!(!host.is_bound_to_object("DtExecuteVpnStart", &first));
        assert_eq!(simulator.state()["vpnState"], json!("CONNECTED"));
    }

    #[test]
    fn registry_views() {
        let simulator = Simulator::new(HostScope::new(), SimulatorOptions::default());
        assert_eq!(simulator.bridge_object_names().len(), 48);
        assert_eq!(simulator.callback_names()[0], "DtVpnStateEvent");
        assert!(simulator
            .semantic_event_to_callback()
            .contains(&("showErrorToast", "DtErrorToastEvent")));
        assert!(simulator.auto_events());
        assert!(!simulator.allow_in_webview());
        assert!(simulator.bridge_object("DtNotABridge").is_none());
    }
}
