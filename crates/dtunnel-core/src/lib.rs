// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DTunnel core: registry constants and the event and error types shared
// by the bridge and the simulator.

pub mod config;
pub mod error;
pub mod json;
pub mod registry;
pub mod types;

pub use config::SdkConfig;
pub use error::{BridgeError, BridgeErrorCode, DtunnelError, HostFault};
pub use registry::{NativeCallback, PayloadPolicy, SemanticEvent};
pub use types::*;
