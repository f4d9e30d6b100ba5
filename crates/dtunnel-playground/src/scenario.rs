// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scripted scenarios driven through the SDK client against a fresh
// simulated host.

use std::cell::RefCell;
use std::rc::Rc;

use clap::ValueEnum;
use dtunnel_bridge::{HostScope, Sdk};
use dtunnel_core::{BridgeError, ErrorEvent, EventEnvelope, SdkConfig};
use dtunnel_simulator::{CallRecord, SimulatorOptions, install_simulator};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Start the VPN, read its state, stop it.
    Vpn,
    /// Run a user check.
    CheckUser,
    /// Post a device notification.
    Notification,
    /// Every scenario above, in order.
    All,
}

impl Scenario {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vpn => "vpn",
            Self::CheckUser => "check-user",
            Self::Notification => "notification",
            Self::All => "all",
        }
    }

    fn steps(self) -> &'static [Scenario] {
        match self {
            Self::Vpn => &[Self::Vpn],
            Self::CheckUser => &[Self::CheckUser],
            Self::Notification => &[Self::Notification],
            Self::All => &[Self::Vpn, Self::CheckUser, Self::Notification],
        }
    }
}

/// Everything observed while a scenario ran.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub scenarios: Vec<&'static str>,
    pub strict: bool,
    pub simulator_installed: bool,
    /// Envelopes seen on the `nativeEvent` channel, in delivery order.
    pub events: Vec<EventEnvelope>,
    /// Lenient-mode failures published on the `error` channel.
    pub errors: Vec<ErrorEvent>,
    /// Strict-mode failures returned to the scenario.
    pub failures: Vec<BridgeError>,
    pub calls: Vec<CallRecord>,
}

/// Run `scenario` on a new host and tear everything down afterwards.
pub fn run(scenario: Scenario, config: SdkConfig, options: SimulatorOptions) -> Report {
    let host = HostScope::new();
    let simulator = install_simulator(host.clone(), options);
    let sdk = Sdk::new(host, config);

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    sdk.on_native_event(move |envelope| sink.borrow_mut().push(envelope.clone()));

    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&errors);
    sdk.on_error(move |event| sink.borrow_mut().push(event.clone()));

    let mut failures = Vec::new();
    for step in scenario.steps() {
        info!(scenario = step.as_str(), "running scenario");
        if let Err(err) = run_step(&sdk, *step) {
            warn!(scenario = step.as_str(), error = %err, "scenario step failed");
            failures.push(err);
        }
    }

    let report = Report {
        scenarios: scenario.steps().iter().map(|step| step.as_str()).collect(),
        strict: sdk.strict(),
        simulator_installed: simulator.is_installed(),
        events: events.take(),
        errors: errors.take(),
        failures,
        calls: simulator.calls(),
    };

    sdk.destroy();
    simulator.uninstall();
    report
}

fn run_step(sdk: &Sdk, scenario: Scenario) -> Result<(), BridgeError> {
    match scenario {
        Scenario::Vpn => {
            let main = sdk.main();
            main.start_vpn()?;
            let state = main.get_vpn_state()?;
            info!(%state, "vpn state after start");
            main.stop_vpn()
        }
        Scenario::CheckUser => sdk.main().start_check_user(),
        Scenario::Notification => {
            sdk.android()
                .send_notification("DTunnel", "Hello from the playground", None)
        }
        Scenario::All => Ok(()),
    }
}
