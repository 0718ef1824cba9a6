//! Controller registry: owns every bus and every confirmed controller.
//!
//! ```text
//!  AdapterRegistry ──▶ BusEnumerator ──▶ AddressRemapper ──▶ probe ──▶ ControllerRegistry
//! ```
//!
//! Built once per run.  Buses live in an arena; controllers refer to
//! their bus by [`BusId`] and borrow the transport only while a
//! [`Controller`] client is alive.  Nothing is removed after discovery.

use log::{info, warn};
use serde::Serialize;

use crate::app::events::DiscoveryEvent;
use crate::app::ports::{AdapterRegistry, EventSink};
use crate::bus::{Address, Bus, BusId};
use crate::color::Color;
use crate::config::DiscoveryConfig;
use crate::drivers::aura::{Controller, DEVICE_NAME_LEN};
use crate::error::{Error, Result};

use super::enumerator::BusEnumerator;
use super::probe;
use super::remap::AddressRemapper;

/// A confirmed Aura controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerRecord {
    pub bus: BusId,
    pub address: Address,
    /// Identity string read at discovery; empty if the read failed.
    pub name: heapless::String<DEVICE_NAME_LEN>,
}

/// A controller operation that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerFailure {
    pub controller: ControllerRecord,
    #[serde(serialize_with = "serialize_display")]
    pub error: Error,
}

fn serialize_display<S: serde::Serializer>(e: &Error, s: S) -> core::result::Result<S::Ok, S::Error> {
    s.collect_str(e)
}

#[derive(Debug, Default)]
pub struct ControllerRegistry {
    buses: Vec<Bus>,
    controllers: Vec<ControllerRecord>,
}

impl ControllerRegistry {
    /// Enumerate adapters, then remap and probe every bus.
    pub fn discover(
        adapters: &mut dyn AdapterRegistry,
        config: &DiscoveryConfig,
        sink: &mut impl EventSink,
    ) -> Self {
        let buses = BusEnumerator::new(config).discover(adapters, sink);
        Self::from_buses(buses, config, sink)
    }

    /// Remap and probe already-open buses.
    pub fn from_buses(buses: Vec<Bus>, config: &DiscoveryConfig, sink: &mut impl EventSink) -> Self {
        let mut registry = Self { buses, controllers: Vec::new() };
        let remapper = AddressRemapper::new(config);
        let candidates = config.probe_addresses();

        for bus in &mut registry.buses {
            remapper.remap(bus, sink);

            for &address in &candidates {
                if !probe::is_aura_controller(bus.transport(), address) {
                    continue;
                }

                let name_read = Controller::new(bus.transport(), address).device_name();
                let name = match name_read {
                    Ok(name) => name,
                    Err(e) => {
                        warn!("{} {}: device name read failed: {}", bus.id(), address, e);
                        heapless::String::new()
                    }
                };
                info!("{} {}: Aura controller \"{}\"", bus.id(), address, name);
                sink.emit(&DiscoveryEvent::ControllerFound { bus: bus.id(), address });
                registry.controllers.push(ControllerRecord { bus: bus.id(), address, name });
            }
        }

        sink.emit(&DiscoveryEvent::DiscoveryComplete {
            buses: registry.buses.len(),
            controllers: registry.controllers.len(),
        });
        registry
    }

    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    pub fn bus_mut(&mut self, id: BusId) -> Option<&mut Bus> {
        self.buses.get_mut(id.0)
    }

    pub fn controllers(&self) -> &[ControllerRecord] {
        &self.controllers
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Borrow a register client for controller `index`.
    pub fn controller(&mut self, index: usize) -> Result<Controller<'_>> {
        let record = self.controllers.get(index).ok_or(Error::NoSuchController(index))?;
        let (bus, address) = (record.bus, record.address);
        let bus = self
            .buses
            .get_mut(bus.0)
            .ok_or(Error::NoSuchController(index))?;
        Ok(Controller::new(bus.transport(), address))
    }

    /// Run `op` on every controller in discovery order.  Failures are
    /// collected, not fatal.
    pub fn for_each_controller(
        &mut self,
        mut op: impl FnMut(&mut Controller<'_>) -> Result<()>,
    ) -> Vec<ControllerFailure> {
        let mut failures = Vec::new();
        for index in 0..self.controllers.len() {
            let outcome = self.controller(index).and_then(|mut c| op(&mut c));
            if let Err(error) = outcome {
                let controller = self.controllers[index].clone();
                warn!("{} {}: {}", controller.bus, controller.address, error);
                failures.push(ControllerFailure { controller, error });
            }
        }
        failures
    }

    /// Write `color` to every controller and switch it to direct mode.
    pub fn apply_color(&mut self, color: Color) -> Vec<ControllerFailure> {
        self.for_each_controller(|c| {
            c.set_all_colors_direct(color)?;
            c.set_direct(true)
        })
    }
}
