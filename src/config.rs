//! Discovery configuration.
//!
//! Every address and filter the discovery sequence uses.  The defaults
//! are the values Aura hardware actually answers on; a JSON file can
//! override any subset of them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bus::Address;

/// Addresses and adapter filters for one discovery run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    // --- Adapter filtering ---
    /// Adapters whose name starts with any of these are never opened.
    pub excluded_adapter_prefixes: Vec<String>,

    // --- RAM slot remapping ---
    /// Address every Aura DIMM answers on at power-up.
    pub shared_ram_address: u8,
    /// Maximum number of DIMM slots to remap.
    pub ram_slot_count: u8,
    /// 8-bit address written to slot 0; slot `n` gets `base + 2n`.
    pub remap_address_base: u8,
    /// 7-bit address slot 0 answers on after remapping.
    pub ram_probe_base: u8,

    // --- Fixed probes ---
    /// Motherboard and peripheral controller addresses.
    pub fixed_addresses: Vec<u8>,

    // --- Platform paths (Linux) ---
    pub sysfs_adapter_root: PathBuf,
    pub dev_root: PathBuf,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            excluded_adapter_prefixes: vec!["NVIDIA".to_string()],

            shared_ram_address: 0x77,
            ram_slot_count: 8,
            remap_address_base: 0xE0,
            ram_probe_base: 0x70,

            fixed_addresses: vec![0x40, 0x4E, 0x4F, 0x66],

            sysfs_adapter_root: PathBuf::from("/sys/class/i2c-adapter"),
            dev_root: PathBuf::from("/dev"),
        }
    }
}

/// Errors from loading or validating a [`DiscoveryConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not valid JSON for this schema.
    Parse(serde_json::Error),
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "read failed: {}", e),
            Self::Parse(e) => write!(f, "parse failed: {}", e),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl DiscoveryConfig {
    /// Load and validate a JSON config file.  Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self = serde_json::from_str(&text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would probe outside the 7-bit space or overflow
    /// the remap targets.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shared_ram_address > Address::MAX {
            return Err(ConfigError::ValidationFailed("shared_ram_address above 0x7F"));
        }
        if self.ram_slot_count == 0 || self.ram_slot_count > 8 {
            return Err(ConfigError::ValidationFailed("ram_slot_count must be 1-8"));
        }
        if u16::from(self.ram_probe_base) + u16::from(self.ram_slot_count) > 0x80 {
            return Err(ConfigError::ValidationFailed("ram_probe_base + ram_slot_count above 0x80"));
        }
        if u16::from(self.remap_address_base) + 2 * u16::from(self.ram_slot_count - 1) > 0xFF {
            return Err(ConfigError::ValidationFailed("remap_address_base overflows a byte"));
        }
        if self.fixed_addresses.iter().any(|&a| a > Address::MAX) {
            return Err(ConfigError::ValidationFailed("fixed_addresses entry above 0x7F"));
        }
        Ok(())
    }

    /// Address written to the `I2C_ADDRESS` register of `slot`.
    pub fn remap_target(&self, slot: u8) -> u8 {
        self.remap_address_base.wrapping_add(slot.wrapping_mul(2))
    }

    /// Every address to probe on one bus, in order, without repeats:
    /// remapped RAM slots first, then the fixed addresses.
    pub fn probe_addresses(&self) -> Vec<Address> {
        let ram = (0..self.ram_slot_count).filter_map(|slot| self.ram_probe_base.checked_add(slot));
        let mut out: Vec<Address> = Vec::new();
        for raw in ram.chain(self.fixed_addresses.iter().copied()) {
            if let Some(a) = Address::new(raw) {
                if !out.contains(&a) {
                    out.push(a);
                }
            }
        }
        out
    }

    /// Whether an adapter with this self-reported name must be skipped.
    pub fn is_excluded(&self, adapter_name: &str) -> bool {
        self.excluded_adapter_prefixes
            .iter()
            .any(|p| adapter_name.starts_with(p.as_str()))
    }
}
