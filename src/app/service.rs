//! Application service: one colour-setting run.
//!
//! ```text
//!  raw R G B ──▶ validate ──▶ ControllerRegistry::discover ──▶ apply_color
//! ```
//!
//! Validation happens strictly before the adapter registry is touched:
//! a bad argument never costs a bus transaction.

use log::info;
use serde::Serialize;

use crate::color::Color;
use crate::config::{ConfigError, DiscoveryConfig};
use crate::discovery::{ControllerFailure, ControllerRecord, ControllerRegistry};
use crate::error::{Error, Result};

use super::ports::{AdapterRegistry, EventSink};

/// Summary of one bus opened during a run.
#[derive(Debug, Clone, Serialize)]
pub struct BusSummary {
    pub node: String,
    pub name: String,
}

/// What a run found and did.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub color: Color,
    pub buses: Vec<BusSummary>,
    pub controllers: Vec<ControllerRecord>,
    pub failures: Vec<ControllerFailure>,
}

impl RunReport {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Validate the channels, discover controllers, and set them all to the
/// requested colour in direct mode.
///
/// Returns the registry alongside the report so callers can keep using
/// the discovered controllers (diagnostic dumps, further writes).
pub fn run(
    channels: [&str; 3],
    adapters: &mut dyn AdapterRegistry,
    config: &DiscoveryConfig,
    sink: &mut impl EventSink,
) -> Result<(RunReport, ControllerRegistry)> {
    let color = Color::from_args(channels)?;
    config.validate().map_err(|e| match e {
        ConfigError::ValidationFailed(msg) => Error::Config(msg),
        _ => Error::Config("invalid configuration"),
    })?;

    let mut registry = ControllerRegistry::discover(adapters, config, sink);
    info!("setting {} controller(s) to {}", registry.len(), color);
    let failures = registry.apply_color(color);

    let report = RunReport {
        color,
        buses: registry
            .buses()
            .iter()
            .map(|b| BusSummary {
                node: b.adapter().node.to_string(),
                name: b.name().to_string(),
            })
            .collect(),
        controllers: registry.controllers().to_vec(),
        failures,
    };
    Ok((report, registry))
}
