//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing discovery events to the `log`
//! facade (which the binary routes to stderr through `env_logger`).

use log::{info, warn};

use crate::app::events::{DiscoveryEvent, SkipReason};
use crate::app::ports::EventSink;

/// Adapter that logs every [`DiscoveryEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &DiscoveryEvent) {
        match event {
            DiscoveryEvent::AdapterSkipped { adapter, reason } => match reason {
                SkipReason::OpenFailed(e) => {
                    warn!("ADAPTER | {} \"{}\" | open failed: {}", adapter.node, adapter.name, e);
                }
                SkipReason::Excluded => {
                    info!("ADAPTER | {} \"{}\" | excluded", adapter.node, adapter.name);
                }
                SkipReason::NotI2c => {
                    info!("ADAPTER | {} \"{}\" | not an I2C adapter", adapter.node, adapter.name);
                }
            },
            DiscoveryEvent::BusOpened { bus, adapter } => {
                info!("BUS | {} | {} \"{}\"", bus, adapter.node, adapter.name);
            }
            DiscoveryEvent::SlotRemapped { bus, slot, target } => {
                info!("REMAP | {} | slot {} -> 0x{:02X}", bus, slot, target);
            }
            DiscoveryEvent::RemapWriteFailed { bus, slot, error } => {
                warn!("REMAP | {} | slot {} write failed: {}", bus, slot, error);
            }
            DiscoveryEvent::ControllerFound { bus, address } => {
                info!("FOUND | {} | Aura controller at {}", bus, address);
            }
            DiscoveryEvent::DiscoveryComplete { buses, controllers } => {
                info!("DONE | buses={} controllers={}", buses, controllers);
            }
        }
    }
}
