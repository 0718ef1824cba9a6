//! Aura SMBus library.
//!
//! Finds Aura RGB controllers on a machine's SMBus adapters and sets them
//! to a single direct-mode colour.  Platform access sits behind the port
//! traits in [`app::ports`]; everything else runs unchanged against the
//! in-memory simulator.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod bus;
pub mod color;
pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod drivers;
pub mod error;

pub use error::{Error, Result};
