// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host binding surface.
//
// A WebView host exposes capabilities by injecting named objects into the
// page's global scope and pushes events by calling named global functions.
// `HostScope` is that global scope made explicit: a shared, name-keyed table
// of bindings whose contents are never assumed. Any entry may be missing,
// a plain value, or an object lacking the method a caller wants.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use dtunnel_core::error::HostFault;
use dtunnel_core::json::is_truthy;
use serde_json::Value;

/// Outcome of one host method invocation.
pub type HostResult = std::result::Result<Value, HostFault>;

/// A global callback function installed on the host.
pub type CallbackFn = Rc<dyn Fn(&[Value])>;

/// A host-provided object exposing `execute(...)`, `get()` or `set(value)`.
pub trait CapabilityObject {
    /// Whether `method` resolves to something callable on this object.
    fn has_method(&self, method: &str) -> bool;

    /// Invoke `method` with positional arguments.
    ///
    /// Callers check [`has_method`](Self::has_method) first; implementations
    /// should return a [`HostFault`] for unknown methods rather than panic.
    fn invoke(&self, method: &str, args: &[Value]) -> HostResult;
}

/// Whatever currently sits under a name on the host.
#[derive(Clone)]
pub enum HostBinding {
    Object(Rc<dyn CapabilityObject>),
    Callback(CallbackFn),
    /// A non-callable value, e.g. a malformed or unrelated property.
    Value(Value),
}

impl HostBinding {
    /// Host-language truthiness: objects and callbacks are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Object(_) | Self::Callback(_) => true,
            Self::Value(value) => is_truthy(value),
        }
    }

    /// `null` bindings count as "nothing here" for presence checks.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    pub fn as_object(&self) -> Option<&Rc<dyn CapabilityObject>> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_callback(&self) -> Option<&CallbackFn> {
        match self {
            Self::Callback(callback) => Some(callback),
            _ => None,
        }
    }
}

impl std::fmt::Debug for HostBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Object(_) => f.write_str("Object(..)"),
            Self::Callback(_) => f.write_str("Callback(..)"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// Shared reference to the host's global scope.
///
/// Cloning is cheap and every clone sees the same bindings. The table is
/// never borrowed while host code runs, so callbacks may re-enter freely.
#[derive(Clone, Default)]
pub struct HostScope {
    bindings: Rc<RefCell<HashMap<String, HostBinding>>>,
}

impl HostScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-owning handle to the same scope.
    pub fn downgrade(&self) -> WeakHostScope {
        WeakHostScope {
            bindings: Rc::downgrade(&self.bindings),
        }
    }

    /// Current binding for `name`, or `None` if no such property exists.
    pub fn get(&self, name: &str) -> Option<HostBinding> {
        self.bindings.borrow().get(name).cloned()
    }

    /// Whether a property named `name` exists, whatever its value.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    /// Bind `name`, returning the binding it replaced.
    pub fn set(&self, name: impl Into<String>, binding: HostBinding) -> Option<HostBinding> {
        self.bindings.borrow_mut().insert(name.into(), binding)
    }

    /// Delete the property entirely.
    pub fn remove(&self, name: &str) -> Option<HostBinding> {
        self.bindings.borrow_mut().remove(name)
    }

    pub fn set_object(&self, name: impl Into<String>, object: impl CapabilityObject + 'static) {
        self.set(name, HostBinding::Object(Rc::new(object)));
    }

    pub fn set_callback(&self, name: impl Into<String>, callback: impl Fn(&[Value]) + 'static) {
        self.set(name, HostBinding::Callback(Rc::new(callback)));
    }

    pub fn set_value(&self, name: impl Into<String>, value: Value) {
        self.set(name, HostBinding::Value(value));
    }

    /// Sorted property names.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Call the function bound under `name`, if it is one.
    ///
    /// Returns `false` when nothing callable is bound there.
    pub fn invoke_callback(&self, name: &str, args: &[Value]) -> bool {
        let callback = match self.get(name) {
            Some(HostBinding::Callback(callback)) => callback,
            _ => return false,
        };
        callback(args);
        true
    }

    /// Whether `name` is bound to exactly this object (identity, not shape).
    pub fn is_bound_to_object(&self, name: &str, object: &Rc<dyn CapabilityObject>) -> bool {
        matches!(
            self.bindings.borrow().get(name),
            Some(HostBinding::Object(current)) if Rc::ptr_eq(current, object)
        )
    }

    /// Whether `name` is bound to exactly this callback.
    pub fn is_bound_to_callback(&self, name: &str, callback: &CallbackFn) -> bool {
        matches!(
            self.bindings.borrow().get(name),
            Some(HostBinding::Callback(current)) if Rc::ptr_eq(current, callback)
        )
    }
}

impl std::fmt::Debug for HostScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostScope")
            .field("names", &self.names())
            .finish()
    }
}

/// Handle that does not keep the host's global scope alive.
///
/// Objects installed on a host hold one of these to reach back into it
/// without forming a cycle through the binding table.
#[derive(Clone, Default)]
pub struct WeakHostScope {
    bindings: Weak<RefCell<HashMap<String, HostBinding>>>,
}

impl WeakHostScope {
    /// The scope, unless every [`HostScope`] clone has been dropped.
    pub fn upgrade(&self) -> Option<HostScope> {
        self.bindings.upgrade().map(|bindings| HostScope { bindings })
    }
}

impl std::fmt::Debug for WeakHostScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakHostScope")
            .field("live", &(self.bindings.strong_count() > 0))
            .finish()
    }
}

/// A single host method implementation.
pub type MethodFn = Rc<dyn Fn(&[Value]) -> HostResult>;

/// Capability object assembled from a method table.
///
/// Used to adapt a real host API or to build test doubles:
///
/// ```
/// use dtunnel_bridge::{HostObject, HostScope};
/// use serde_json::json;
///
/// let host = HostScope::new();
/// host.set_object(
///     "DtGetVpnState",
///     HostObject::new().with_method("execute", |_args| Ok(json!("CONNECTED"))),
/// );
/// assert!(host.contains("DtGetVpnState"));
/// ```
#[derive(Clone, Default)]
pub struct HostObject {
    methods: HashMap<String, MethodFn>,
}

impl HostObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(
        mut self,
        name: impl Into<String>,
        method: impl Fn(&[Value]) -> HostResult + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Rc::new(method));
        self
    }

    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl CapabilityObject for HostObject {
    fn has_method(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    fn invoke(&self, method: &str, args: &[Value]) -> HostResult {
        match self.methods.get(method) {
            Some(implementation) => implementation(args),
            None => Err(HostFault::new(format!("{method} is not a function"))),
        }
    }
}
