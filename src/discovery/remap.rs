//! DIMM slot remapping.
//!
//! Every Aura DIMM powers up answering on the same shared address.  One
//! at a time, the device currently answering there is told its slot index
//! and a new 8-bit address, after which it stops answering on the shared
//! address and the next quick write reaches the next unclaimed module.
//! The loop stops at the first quick write nobody acknowledges.

use log::warn;

use crate::app::events::DiscoveryEvent;
use crate::app::ports::{EventSink, QuickDirection};
use crate::bus::{Address, Bus};
use crate::config::DiscoveryConfig;
use crate::drivers::aura::Controller;

/// A slot that was successfully handed an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAssignment {
    pub slot: u8,
    /// 8-bit value written to the `I2C_ADDRESS` register.
    pub target: u8,
}

pub struct AddressRemapper<'c> {
    config: &'c DiscoveryConfig,
}

impl<'c> AddressRemapper<'c> {
    pub fn new(config: &'c DiscoveryConfig) -> Self {
        Self { config }
    }

    /// Run the remap protocol once on `bus`.
    pub fn remap(&self, bus: &mut Bus, sink: &mut impl EventSink) -> Vec<SlotAssignment> {
        let mut assigned = Vec::new();
        let Some(shared) = Address::new(self.config.shared_ram_address) else {
            warn!("shared RAM address 0x{:02X} is not 7-bit; remap skipped", self.config.shared_ram_address);
            return assigned;
        };
        let bus_id = bus.id();

        for slot in 0..self.config.ram_slot_count {
            if bus.transport().write_quick(shared.get(), QuickDirection::Write).is_err() {
                break;
            }

            let target = self.config.remap_target(slot);
            let mut client = Controller::new(bus.transport(), shared);
            match client.assign_slot(slot, target) {
                Ok(()) => {
                    sink.emit(&DiscoveryEvent::SlotRemapped { bus: bus_id, slot, target });
                    assigned.push(SlotAssignment { slot, target });
                }
                Err(error) => {
                    sink.emit(&DiscoveryEvent::RemapWriteFailed { bus: bus_id, slot, error });
                }
            }
        }

        assigned
    }
}
