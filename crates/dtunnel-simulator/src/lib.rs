// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! DTunnel host simulator.
//!
//! Installs a mock for every DTunnel bridge object on a [`HostScope`],
//! backed by an in-memory state record. Pages and tests drive it through
//! the normal SDK; the controller adds call recording, per-method
//! overrides and synthetic host events. Installation refuses to shadow a
//! host that already exposes a bridge.
//!
//! ```
//! use dtunnel_bridge::{HostScope, Sdk};
//! use dtunnel_core::SdkConfig;
//! use dtunnel_simulator::{SimulatorOptions, install_simulator};
//!
//! let host = HostScope::new();
//! let simulator = install_simulator(host.clone(), SimulatorOptions::default());
//! let sdk = Sdk::new(host, SdkConfig::default());
//!
//! sdk.main().start_vpn().unwrap();
//! assert_eq!(sdk.main().get_vpn_state().unwrap(), "CONNECTED");
//! assert_eq!(simulator.calls().len(), 2);
//! ```
//!
//! [`HostScope`]: dtunnel_bridge::HostScope

mod behaviors;
pub mod options;
pub mod simulator;
pub mod state;

pub use options::SimulatorOptions;
pub use simulator::{CallRecord, Implementation, ImplementationFn, Simulator, install_simulator};
pub use state::{State, default_state, merge_deep};
