// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! DTunnel WebView host bridge.
//!
//! The page talks to the native host through capability objects the host
//! injects under fixed names, and the host talks back by calling global
//! callback functions. This crate models that surface as an explicit
//! [`HostScope`] passed to every component, so the same code runs against a
//! real host adapter, a test double, or the bundled simulator.
//!
//! - [`gateway::BridgeGateway`] performs guarded method calls.
//! - [`native_events::NativeEventsAdapter`] installs callback trampolines and
//!   translates invocations into [`dtunnel_core::EventEnvelope`]s.
//! - [`bus::EventBus`] delivers envelopes and errors to subscribers.
//! - [`sdk::Sdk`] ties them together behind the capability facades.

pub mod bus;
pub mod facades;
pub mod gateway;
pub mod host;
pub mod native_events;
pub mod sdk;

pub use bus::{EventBus, ListenerId, Subscription};
pub use facades::{AndroidModule, AppModule, ConfigModule, MainModule, TextModule};
pub use gateway::{BridgeGateway, BridgeLogger, CallOptions, TracingLogger};
pub use host::{CallbackFn, CapabilityObject, HostBinding, HostObject, HostResult, HostScope, WeakHostScope};
pub use native_events::{NativeEventsAdapter, dispatch};
pub use sdk::{DebugSnapshot, ObjectAvailability, Sdk, VERSION};
