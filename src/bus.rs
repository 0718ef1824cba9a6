//! Buses, addresses, and adapter descriptors.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::app::ports::{SmbusTransport, TransportError};

/// Longest adapter name kept; Linux caps `i2c_adapter.name` at 48 bytes.
pub const ADAPTER_NAME_LEN: usize = 64;
/// Longest kernel node name kept (`i2c-N`).
pub const ADAPTER_NODE_LEN: usize = 32;

// ── Address ───────────────────────────────────────────────────

/// A 7-bit device address.  Unique only within one bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Address(u8);

impl Address {
    pub const MAX: u8 = 0x7F;

    pub const fn new(raw: u8) -> Option<Self> {
        if raw <= Self::MAX { Some(Self(raw)) } else { None }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Address {
    type Error = TransportError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or(TransportError::InvalidAddress(raw))
    }
}

impl From<Address> for u8 {
    fn from(a: Address) -> Self {
        a.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

// ── Adapter descriptor ────────────────────────────────────────

/// What sort of adapter the platform reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdapterKind {
    /// A physical I2C/SMBus adapter.
    I2c,
    /// Anything else in the adapter list (virtual bridges, stray entries).
    Other,
}

/// One entry from the platform adapter list, before it is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterInfo {
    /// Kernel node name, e.g. `i2c-3`.
    pub node: heapless::String<ADAPTER_NODE_LEN>,
    /// Self-reported adapter name, trimmed.
    pub name: heapless::String<ADAPTER_NAME_LEN>,
    pub kind: AdapterKind,
}

impl AdapterInfo {
    /// Build a descriptor, truncating overlong text at a char boundary.
    pub fn new(node: &str, name: &str, kind: AdapterKind) -> Self {
        Self {
            node: bounded(node),
            name: bounded(name.trim()),
            kind,
        }
    }
}

fn bounded<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for ch in s.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

// ── Bus ───────────────────────────────────────────────────────

/// Position of a bus in the registry's bus list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusId(pub usize);

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bus{}", self.0)
    }
}

/// An opened adapter.  Owns its transport exclusively; dropping the bus
/// closes the underlying handle.
pub struct Bus {
    id: BusId,
    adapter: AdapterInfo,
    transport: Box<dyn SmbusTransport>,
}

impl Bus {
    pub fn new(id: BusId, adapter: AdapterInfo, transport: Box<dyn SmbusTransport>) -> Self {
        Self { id, adapter, transport }
    }

    pub fn id(&self) -> BusId {
        self.id
    }

    pub fn adapter(&self) -> &AdapterInfo {
        &self.adapter
    }

    pub fn name(&self) -> &str {
        &self.adapter.name
    }

    pub fn transport(&mut self) -> &mut dyn SmbusTransport {
        self.transport.as_mut()
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("id", &self.id)
            .field("adapter", &self.adapter)
            .finish_non_exhaustive()
    }
}
