// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge gateway: guarded calls into host capability objects.
//
// Every call resolves the named object, checks the method, invokes it and
// classifies failures into the three `BridgeErrorCode`s. What happens to a
// failure is decided once, at construction:
//
//   strict   the `BridgeError` is returned to the caller, nothing is emitted
//   lenient  the failure is logged, published on the `error` channel, and
//            the call resolves to `null`

use std::rc::Rc;

use dtunnel_core::error::BridgeError;
use dtunnel_core::json::safe_parse_json;
use dtunnel_core::types::{BridgeEvent, ERROR_CHANNEL, ErrorEvent};
use serde_json::Value;
use tracing::{error, instrument, trace};

use crate::bus::EventBus;
use crate::host::{HostBinding, HostScope};

/// Destination for lenient-mode failure reports.
pub trait BridgeLogger {
    fn bridge_error(&self, error: &BridgeError);
}

/// Default logger: structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl BridgeLogger for TracingLogger {
    fn bridge_error(&self, err: &BridgeError) {
        error!(
            code = %err.code,
            object = %err.details.object_name,
            method = %err.details.method_name,
            "{}",
            err.message
        );
    }
}

/// Per-call result handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Best-effort JSON decode of the returned value.
    pub parse_json: bool,
    /// Discard the returned value.
    pub expect_void: bool,
}

impl CallOptions {
    pub fn json() -> Self {
        Self {
            parse_json: true,
            expect_void: false,
        }
    }

    pub fn void() -> Self {
        Self {
            parse_json: false,
            expect_void: true,
        }
    }
}

pub struct BridgeGateway {
    host: HostScope,
    strict: bool,
    logger: Rc<dyn BridgeLogger>,
    bus: EventBus<BridgeEvent>,
}

impl BridgeGateway {
    pub fn new(host: HostScope, strict: bool, bus: EventBus<BridgeEvent>) -> Self {
        Self::with_logger(host, strict, bus, Rc::new(TracingLogger))
    }

    pub fn with_logger(
        host: HostScope,
        strict: bool,
        bus: EventBus<BridgeEvent>,
        logger: Rc<dyn BridgeLogger>,
    ) -> Self {
        Self {
            host,
            strict,
            logger,
            bus,
        }
    }

    pub fn host(&self) -> &HostScope {
        &self.host
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn get_object(&self, object_name: &str) -> Option<HostBinding> {
        self.host.get(object_name)
    }

    /// Whether a truthy binding exists under `object_name`.
    pub fn has_object(&self, object_name: &str) -> bool {
        self.host
            .get(object_name)
            .is_some_and(|binding| binding.is_truthy())
    }

    /// Call according to the configured failure policy.
    ///
    /// In lenient mode this never returns `Err`.
    pub fn call(
        &self,
        object_name: &str,
        method_name: &str,
        args: &[Value],
        options: CallOptions,
    ) -> Result<Value, BridgeError> {
        if self.strict {
            self.call_strict(object_name, method_name, args, options)
        } else {
            Ok(self.call_lenient(object_name, method_name, args, options))
        }
    }

    /// Strict adapter: failures go straight back to the caller.
    pub fn call_strict(
        &self,
        object_name: &str,
        method_name: &str,
        args: &[Value],
        options: CallOptions,
    ) -> Result<Value, BridgeError> {
        self.try_call(object_name, method_name, args, options)
    }

    /// Lenient adapter: failures are reported and resolve to `null`.
    pub fn call_lenient(
        &self,
        object_name: &str,
        method_name: &str,
        args: &[Value],
        options: CallOptions,
    ) -> Value {
        match self.try_call(object_name, method_name, args, options) {
            Ok(value) => value,
            Err(err) => {
                self.report(err);
                Value::Null
            }
        }
    }

    /// Resolve, validate and invoke without applying any failure policy.
    #[instrument(level = "trace", skip(self, args))]
    pub fn try_call(
        &self,
        object_name: &str,
        method_name: &str,
        args: &[Value],
        options: CallOptions,
    ) -> Result<Value, BridgeError> {
        let binding = match self.host.get(object_name) {
            Some(binding) if binding.is_truthy() => binding,
            _ => return Err(BridgeError::object_not_found(object_name, method_name)),
        };

        let target = match binding {
            HostBinding::Object(object) if object.has_method(method_name) => object,
            _ => return Err(BridgeError::method_not_found(object_name, method_name)),
        };

        let result = target
            .invoke(method_name, args)
            .map_err(|cause| BridgeError::call_failed(object_name, method_name, args, cause))?;
        trace!("bridge call returned");

        if options.expect_void {
            return Ok(Value::Null);
        }
        if options.parse_json {
            return Ok(safe_parse_json(&result));
        }
        Ok(result)
    }

    fn report(&self, err: BridgeError) {
        self.logger.bridge_error(&err);
        self.bus.emit(
            ERROR_CHANNEL,
            &BridgeEvent::Error(ErrorEvent::new(err)),
        );
    }
}
