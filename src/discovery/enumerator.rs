//! Bus enumeration: adapter list → open [`Bus`] handles.
//!
//! Adapters are filtered before they are opened:
//!
//! - only physical I2C adapters are considered;
//! - adapters whose name starts with an excluded prefix are dropped
//!   (NVIDIA GPU adapters look like I2C buses but have no SMBus
//!   controllers behind them, and probing them is unsafe);
//! - adapters that fail to open are skipped, never fatal.

use log::debug;

use crate::app::events::{DiscoveryEvent, SkipReason};
use crate::app::ports::{AdapterRegistry, EventSink};
use crate::bus::{AdapterKind, Bus, BusId};
use crate::config::DiscoveryConfig;

pub struct BusEnumerator<'c> {
    config: &'c DiscoveryConfig,
}

impl<'c> BusEnumerator<'c> {
    pub fn new(config: &'c DiscoveryConfig) -> Self {
        Self { config }
    }

    /// Open every usable adapter, in the order the platform lists them.
    pub fn discover(&self, adapters: &mut dyn AdapterRegistry, sink: &mut impl EventSink) -> Vec<Bus> {
        let mut buses = Vec::new();

        for adapter in adapters.list() {
            let reason = if adapter.kind != AdapterKind::I2c {
                Some(SkipReason::NotI2c)
            } else if self.config.is_excluded(&adapter.name) {
                Some(SkipReason::Excluded)
            } else {
                None
            };
            if let Some(reason) = reason {
                sink.emit(&DiscoveryEvent::AdapterSkipped { adapter, reason });
                continue;
            }

            match adapters.open(&adapter) {
                Ok(transport) => {
                    let id = BusId(buses.len());
                    debug!("opened {} as {}", adapter.node, id);
                    sink.emit(&DiscoveryEvent::BusOpened { bus: id, adapter: adapter.clone() });
                    buses.push(Bus::new(id, adapter, transport));
                }
                Err(e) => {
                    sink.emit(&DiscoveryEvent::AdapterSkipped {
                        adapter,
                        reason: SkipReason::OpenFailed(e),
                    });
                }
            }
        }

        buses
    }
}
