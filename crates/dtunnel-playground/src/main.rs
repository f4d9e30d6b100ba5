// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DTunnel playground: drives the SDK client against the host simulator
// and prints what the page would have observed.
//
// The report (envelopes, error events, call log) goes to stdout as JSON;
// logs go to stderr.

mod scenario;
mod state_file;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dtunnel_core::SdkConfig;
use dtunnel_core::error::Result;
use dtunnel_simulator::SimulatorOptions;

use scenario::Scenario;

#[derive(Debug, Parser)]
#[command(
    name = "dtunnel-playground",
    about = "Run scripted DTunnel bridge scenarios against the host simulator",
    version
)]
struct Cli {
    /// Return bridge failures to the scenario instead of reporting them.
    #[arg(long, env = "DTUNNEL_STRICT")]
    strict: bool,

    /// Do not raise the callbacks a device would fire on its own.
    #[arg(long)]
    no_auto_events: bool,

    /// Install the simulator even over an existing bridge.
    #[arg(long)]
    allow_in_webview: bool,

    /// JSON object merged over the simulator's baseline state.
    #[arg(long, value_name = "FILE")]
    state: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Scenario::All)]
    scenario: Scenario,
}

impl Cli {
    fn sdk_config(&self) -> SdkConfig {
        SdkConfig {
            strict: self.strict,
            ..SdkConfig::default()
        }
    }

    fn simulator_options(&self) -> Result<SimulatorOptions> {
        let state = self
            .state
            .as_deref()
            .map(state_file::load_state_patch)
            .transpose()?;
        Ok(SimulatorOptions {
            auto_events: !self.no_auto_events,
            allow_in_webview: self.allow_in_webview,
            state,
        })
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "playground failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    tracing::info!(version = dtunnel_bridge::VERSION, "DTunnel playground starting");
    let report = scenario::run(cli.scenario, cli.sdk_config(), cli.simulator_options()?);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
