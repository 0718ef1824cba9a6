//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter     | Implements                       | Connects to               |
//! |-------------|----------------------------------|---------------------------|
//! | `linux`     | AdapterRegistry, SmbusTransport  | sysfs + `/dev/i2c-N`      |
//! | `embedded`  | SmbusTransport                   | any `embedded_hal` I2C bus|
//! | `sim`       | AdapterRegistry, SmbusTransport  | in-memory Aura devices    |
//! | `log_sink`  | EventSink                        | `log` facade              |

pub mod embedded;
#[cfg(target_os = "linux")]
pub mod linux;
pub mod log_sink;
pub mod sim;

use crate::app::ports::{AdapterRegistry, SmbusTransport, TransportError};
use crate::bus::AdapterInfo;
use crate::config::DiscoveryConfig;

/// Registry for platforms with no SMBus backend: lists nothing.
#[derive(Debug, Default)]
pub struct NoAdapters;

impl AdapterRegistry for NoAdapters {
    fn list(&mut self) -> Vec<AdapterInfo> {
        Vec::new()
    }

    fn open(&mut self, _adapter: &AdapterInfo) -> Result<Box<dyn SmbusTransport>, TransportError> {
        Err(TransportError::Unsupported)
    }
}

/// The adapter registry for the platform this binary runs on.
pub fn platform_adapters(config: &DiscoveryConfig) -> Box<dyn AdapterRegistry> {
    #[cfg(target_os = "linux")]
    {
        Box::new(linux::SysfsAdapterRegistry::new(
            config.sysfs_adapter_root.clone(),
            config.dev_root.clone(),
        ))
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = config;
        log::warn!("no SMBus backend for this platform; no adapters will be found");
        Box::new(NoAdapters)
    }
}
