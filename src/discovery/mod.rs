//! Aura controller discovery.
//!
//! Leaf-first: [`enumerator`] opens buses, [`remap`] moves DIMM
//! controllers off their shared address, [`probe`] confirms a controller
//! at one address, and [`registry`] runs all three over every bus.

pub mod enumerator;
pub mod probe;
pub mod registry;
pub mod remap;

pub use enumerator::BusEnumerator;
pub use probe::{ProbeOutcome, is_aura_controller, probe};
pub use registry::{ControllerFailure, ControllerRecord, ControllerRegistry};
pub use remap::{AddressRemapper, SlotAssignment};
