//! Device drivers.

pub mod aura;
