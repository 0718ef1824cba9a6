//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one subsystem against
//! recording mock adapters.  Everything runs on the host with no real
//! SMBus required.

mod controller_tests;
mod discovery_tests;
mod mock_hw;
mod service_tests;
