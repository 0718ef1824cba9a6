//! aura-smbus: set every Aura RGB controller on the machine to one colour.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  SysfsAdapterRegistry   SimAdapterRegistry   LogEventSink    │
//! │  (/dev/i2c-*)           (--simulate)         (EventSink)     │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ─────────────────       │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │  app::service::run                                   │    │
//! │  │  BusEnumerator · AddressRemapper · probe · Registry  │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

// ── Imports ───────────────────────────────────────────────────
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use aura_smbus::adapters::log_sink::LogEventSink;
use aura_smbus::adapters::platform_adapters;
use aura_smbus::adapters::sim::SimAdapterRegistry;
use aura_smbus::app::ports::AdapterRegistry;
use aura_smbus::app::service::{self, RunReport};
use aura_smbus::config::DiscoveryConfig;
use aura_smbus::diagnostics::{self, ScanMode};
use aura_smbus::discovery::ControllerRegistry;

// ── Command line ──────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "aura-smbus")]
#[command(about = "Set all Aura RGB controllers on the SMBus to one colour")]
#[command(version)]
struct Cli {
    /// Red channel, 0-255
    #[arg(allow_negative_numbers = true)]
    red: String,

    /// Green channel, 0-255
    #[arg(allow_negative_numbers = true)]
    green: String,

    /// Blue channel, 0-255
    #[arg(allow_negative_numbers = true)]
    blue: String,

    /// JSON discovery configuration; missing fields take defaults
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Run against a simulated board instead of the real SMBus
    #[arg(long = "simulate")]
    simulate: bool,

    /// Append an address occupancy table for every bus to FILE
    #[arg(long = "scan", value_name = "FILE")]
    scan: Option<PathBuf>,

    /// Append a full register dump of every controller to FILE
    #[arg(long = "dump", value_name = "FILE")]
    dump: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

// ── Entry point ───────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    log::debug!("aura-smbus v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => DiscoveryConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DiscoveryConfig::default(),
    };

    let mut adapters: Box<dyn AdapterRegistry> = if cli.simulate {
        info!("using simulated board");
        Box::new(SimAdapterRegistry::demo_board())
    } else {
        platform_adapters(&config)
    };

    let mut sink = LogEventSink::new();
    let (report, mut registry) = service::run(
        [cli.red.as_str(), cli.green.as_str(), cli.blue.as_str()],
        adapters.as_mut(),
        &config,
        &mut sink,
    )
    .context("setting colour")?;

    if let Some(path) = &cli.scan {
        write_scan(&mut registry, path)
            .with_context(|| format!("writing scan to {}", path.display()))?;
    }
    if let Some(path) = &cli.dump {
        write_dump(&mut registry, path)
            .with_context(|| format!("writing dump to {}", path.display()))?;
    }

    print_summary(&report);
    if !report.all_succeeded() {
        anyhow::bail!("{} controller(s) failed", report.failures.len());
    }
    Ok(())
}

// ── Diagnostics output ────────────────────────────────────────

fn write_scan(registry: &mut ControllerRegistry, path: &std::path::Path) -> Result<()> {
    let ids: Vec<_> = registry.buses().iter().map(|b| b.id()).collect();
    for id in ids {
        let Some(bus) = registry.bus_mut(id) else { continue };
        let header = format!("{} \"{}\"\n", bus.adapter().node, bus.name());
        let table = diagnostics::scan_bus(bus.transport(), ScanMode::Auto).render();
        diagnostics::append_to_file(path, &format!("{header}{table}\n"))?;
    }
    info!("bus scan appended to {}", path.display());
    Ok(())
}

fn write_dump(registry: &mut ControllerRegistry, path: &std::path::Path) -> Result<()> {
    for index in 0..registry.len() {
        let record = registry.controllers()[index].clone();
        let mut controller = registry.controller(index)?;
        let dump = diagnostics::dump_registers(&mut controller);
        if dump.failed_reads() > 0 {
            warn!("{} {}: {} register reads failed", record.bus, record.address, dump.failed_reads());
        }
        let header = format!("{} {} \"{}\"\n", record.bus, record.address, record.name);
        diagnostics::append_to_file(path, &format!("{header}{}\n", dump.render()))?;
    }
    info!("register dump appended to {}", path.display());
    Ok(())
}

fn print_summary(report: &RunReport) {
    println!(
        "{} bus(es), {} controller(s), colour {}",
        report.buses.len(),
        report.controllers.len(),
        report.color
    );
    for c in &report.controllers {
        println!("  {} {} {}", c.bus, c.address, c.name);
    }
    for f in &report.failures {
        println!("  FAILED {} {}: {}", f.controller.bus, f.controller.address, f.error);
    }
}
