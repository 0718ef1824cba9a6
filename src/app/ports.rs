//! Port traits at the boundary between the discovery core and the platform.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ discovery / drivers (domain)
//! ```
//!
//! Platform adapters (Linux i2c-dev, embedded-hal buses, the in-memory
//! simulator) implement these traits.  Discovery and the Aura register
//! client consume them, so the algorithms never touch a file descriptor
//! directly.
//!
//! ## Bus safety notes
//!
//! - SMBus transactions on one adapter are not interleavable.  Every
//!   primitive takes `&mut self`, so a transport can only be driven from
//!   one place at a time.
//! - An `Err` from any primitive is authoritative for that call.  Nothing
//!   in the crate retries.

use crate::bus::AdapterInfo;

// ───────────────────────────────────────────────────────────────
// SMBus transport port (driven adapter: domain → bus)
// ───────────────────────────────────────────────────────────────

/// Direction bit carried by an SMBus quick command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickDirection {
    Write,
    Read,
}

/// Blocking request/response access to one physical SMBus adapter.
///
/// Addresses are 7-bit.  Each call is one complete bus transaction.
pub trait SmbusTransport {
    /// Address-only presence probe.  `Ok` means *something* acknowledged.
    fn write_quick(&mut self, address: u8, direction: QuickDirection) -> Result<(), TransportError>;

    /// Receive one byte with no command code.
    fn read_byte(&mut self, address: u8) -> Result<u8, TransportError>;

    /// Read one byte at an 8-bit command code.
    fn read_byte_data(&mut self, address: u8, command: u8) -> Result<u8, TransportError>;

    /// Write one byte at an 8-bit command code.
    fn write_byte_data(&mut self, address: u8, command: u8, value: u8) -> Result<(), TransportError>;

    /// Write a 16-bit word (little-endian on the wire) at an 8-bit command code.
    fn write_word_data(&mut self, address: u8, command: u8, value: u16) -> Result<(), TransportError>;
}

impl<T: SmbusTransport + ?Sized> SmbusTransport for Box<T> {
    fn write_quick(&mut self, address: u8, direction: QuickDirection) -> Result<(), TransportError> {
        (**self).write_quick(address, direction)
    }

    fn read_byte(&mut self, address: u8) -> Result<u8, TransportError> {
        (**self).read_byte(address)
    }

    fn read_byte_data(&mut self, address: u8, command: u8) -> Result<u8, TransportError> {
        (**self).read_byte_data(address, command)
    }

    fn write_byte_data(&mut self, address: u8, command: u8, value: u8) -> Result<(), TransportError> {
        (**self).write_byte_data(address, command, value)
    }

    fn write_word_data(&mut self, address: u8, command: u8, value: u16) -> Result<(), TransportError> {
        (**self).write_word_data(address, command, value)
    }
}

// ───────────────────────────────────────────────────────────────
// Adapter registry port (driven adapter: platform → domain)
// ───────────────────────────────────────────────────────────────

/// The platform's list of transport adapters.
///
/// Listing and opening are separate so the enumerator can filter on the
/// self-reported name before any device node is touched.
pub trait AdapterRegistry {
    /// Every adapter the platform knows about, in discovery order.
    fn list(&mut self) -> Vec<AdapterInfo>;

    /// Open `adapter` for read/write transactions.
    fn open(&mut self, adapter: &AdapterInfo) -> Result<Box<dyn SmbusTransport>, TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / UI)
// ───────────────────────────────────────────────────────────────

/// Discovery emits structured [`DiscoveryEvent`](super::events::DiscoveryEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::DiscoveryEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`SmbusTransport`] and [`AdapterRegistry`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No device acknowledged the address.
    Nack,
    /// The OS rejected the transaction; carries `errno`.
    Io(i32),
    /// Bus-level failure without an OS error code (arbitration loss, overrun).
    Bus,
    /// The backend cannot express this transaction.
    Unsupported,
    /// Address outside the 7-bit range.
    InvalidAddress(u8),
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Nack => write!(f, "no acknowledge"),
            Self::Io(errno) => write!(f, "I/O error (errno={})", errno),
            Self::Bus => write!(f, "bus error"),
            Self::Unsupported => write!(f, "transaction not supported by adapter"),
            Self::InvalidAddress(addr) => write!(f, "invalid 7-bit address 0x{:02X}", addr),
        }
    }
}

impl std::error::Error for TransportError {}
