//! # smarthomed — smarthome daemon
//!
//! Composition root that wires the controller to its adapters and runs the
//! command loop.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Install the tracing subscriber (logs go to stderr, output to stdout)
//! - Construct the virtual thermometer and the tokio scheduler
//! - Construct the controller and register the configured devices
//! - Run a single-writer loop over stdin lines, due scheduled jobs and the
//!   polling tick
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod shell;

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Interval;
use tracing_subscriber::EnvFilter;

use smarthome_adapter_virtual::{TokioScheduler, VirtualThermometer};
use smarthome_app::controller::SmartHome;

use crate::config::Config;

fn print(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Wait for the next polling tick, or forever when polling is disabled.
async fn tick(poll: &mut Option<Interval>) {
    match poll {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_writer(std::io::stderr)
        .init();

    // Adapters
    let thermometer = Arc::new(VirtualThermometer::new(config.sensor.initial_temperature));
    let (scheduler, mut due) = TokioScheduler::channel();

    // Controller
    let mut home = SmartHome::new(Arc::clone(&thermometer), scheduler);
    for device in &config.devices {
        home.register_device(device.kind.as_str(), device.status)?;
    }
    tracing::info!(
        devices = home.registry().len(),
        temperature = thermometer.get(),
        poll_secs = config.polling.interval_secs,
        "smarthomed ready"
    );

    let mut poll = config.poll_interval().map(tokio::time::interval);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                print(&shell::handle_line(&mut home, &thermometer, &line));
            }
            Some(job) = due.recv() => {
                print(&shell::render(home.fire(&job)));
            }
            () = tick(&mut poll) => {
                if let Err(err) = home.notify_all() {
                    tracing::warn!(error = %err, "trigger polling failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    tracing::info!("smarthomed shutting down");
    Ok(())
}
