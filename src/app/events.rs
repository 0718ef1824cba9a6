//! Outbound discovery events.
//!
//! Discovery emits these through the [`EventSink`](super::ports::EventSink)
//! port.  The adapter on the other side decides where they end up.

use crate::app::ports::TransportError;
use crate::bus::{AdapterInfo, Address, BusId};
use crate::error::Error;

/// Why an adapter never became a [`Bus`](crate::bus::Bus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not a physical I2C adapter.
    NotI2c,
    /// Name matched an excluded prefix.
    Excluded,
    /// The device node could not be opened.
    OpenFailed(TransportError),
}

/// Structured events emitted during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    /// An adapter was left out of the bus list.
    AdapterSkipped { adapter: AdapterInfo, reason: SkipReason },

    /// An adapter was opened and added as a bus.
    BusOpened { bus: BusId, adapter: AdapterInfo },

    /// A DIMM controller was moved off the shared address.
    SlotRemapped { bus: BusId, slot: u8, target: u8 },

    /// A remap register write failed; the slot stays unassigned.
    RemapWriteFailed { bus: BusId, slot: u8, error: Error },

    /// An address passed both probe stages.
    ControllerFound { bus: BusId, address: Address },

    /// Discovery finished (carries totals).
    DiscoveryComplete { buses: usize, controllers: usize },
}
