//! Application layer: port traits, discovery events, and the run service.
//!
//! All interaction with buses happens through the traits in [`ports`],
//! keeping discovery and the register client testable without hardware.

pub mod events;
pub mod ports;
pub mod service;
