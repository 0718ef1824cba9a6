//! Aura register client.
//!
//! An Aura controller exposes a 16-bit register space behind three SMBus
//! command codes:
//!
//! | Command | Transaction      | Meaning                                  |
//! |---------|------------------|------------------------------------------|
//! | `0x00`  | word write       | select register (address sent big-endian)|
//! | `0x01`  | byte write       | write selected register                  |
//! | `0x81`  | byte read        | read selected register                   |
//!
//! Every register access is therefore two bus transactions.  Nothing is
//! cached; every call is a live round trip.

use crate::app::ports::SmbusTransport;
use crate::bus::Address;
use crate::color::Color;
use crate::error::Result;

// ── Register map ──────────────────────────────────────────────

/// 16-byte NUL-padded ASCII device identity.
pub const REG_DEVICE_NAME: u16 = 0x1000;
/// Direct-mode colour table, 3 bytes per LED in R, B, G order.
pub const REG_COLORS_DIRECT: u16 = 0x8000;
/// 1 = direct control, 0 = internal effect engine.
pub const REG_DIRECT: u16 = 0x8020;
/// Write [`APPLY_VAL`] to latch pending changes.
pub const REG_APPLY: u16 = 0x80A0;
/// RAM slot index used during address remapping.
pub const REG_SLOT_INDEX: u16 = 0x80F8;
/// New 8-bit bus address used during address remapping.
pub const REG_I2C_ADDRESS: u16 = 0x80F9;

pub const APPLY_VAL: u8 = 0x01;

/// LEDs addressable through the direct colour table.
pub const DIRECT_LED_COUNT: u16 = 5;
pub const DEVICE_NAME_LEN: usize = 16;

const CMD_SELECT: u8 = 0x00;
const CMD_WRITE: u8 = 0x01;
const CMD_READ: u8 = 0x81;

// ── Controller ────────────────────────────────────────────────

/// Register client bound to one `(bus, address)` pair.
///
/// Borrows the bus transport for as long as it lives, so two clients on
/// the same bus can never interleave transactions.
pub struct Controller<'b> {
    transport: &'b mut dyn SmbusTransport,
    address: Address,
}

impl<'b> Controller<'b> {
    pub fn new(transport: &'b mut dyn SmbusTransport, address: Address) -> Self {
        Self { transport, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn select(&mut self, register: u16) -> Result<()> {
        // The device expects the high byte first; SMBus words go low byte first.
        self.transport
            .write_word_data(self.address.get(), CMD_SELECT, register.swap_bytes())?;
        Ok(())
    }

    /// Read one register.
    pub fn read_register(&mut self, register: u16) -> Result<u8> {
        self.select(register)?;
        Ok(self.transport.read_byte_data(self.address.get(), CMD_READ)?)
    }

    /// Write one register.
    pub fn write_register(&mut self, register: u16, value: u8) -> Result<()> {
        self.select(register)?;
        self.transport
            .write_byte_data(self.address.get(), CMD_WRITE, value)?;
        Ok(())
    }

    /// Fill `buf` from consecutive registers starting at `start`.
    pub fn read_block(&mut self, start: u16, buf: &mut [u8]) -> Result<()> {
        for (offset, slot) in buf.iter_mut().enumerate() {
            *slot = self.read_register(start.wrapping_add(offset as u16))?;
        }
        Ok(())
    }

    /// Read the device identity string, stopping at the first NUL.
    pub fn device_name(&mut self) -> Result<heapless::String<DEVICE_NAME_LEN>> {
        let mut raw = [0u8; DEVICE_NAME_LEN];
        self.read_block(REG_DEVICE_NAME, &mut raw)?;

        let mut name = heapless::String::new();
        for &b in raw.iter().take_while(|&&b| b != 0) {
            let ch = if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' };
            // Capacity equals the raw length, so this cannot overflow.
            let _ = name.push(ch);
        }
        Ok(name)
    }

    fn apply(&mut self) -> Result<()> {
        self.write_register(REG_APPLY, APPLY_VAL)
    }

    /// Write `color` into every direct-mode LED and latch it.
    ///
    /// Channels land in the device's R, B, G register order, not R, G, B.
    ///
    /// Has no visible effect until direct mode is enabled with
    /// [`set_direct`](Self::set_direct).
    pub fn set_all_colors_direct(&mut self, color: Color) -> Result<()> {
        for led in 0..DIRECT_LED_COUNT {
            let base = REG_COLORS_DIRECT + led * 3;
            self.write_register(base, color.red)?;
            self.write_register(base + 1, color.blue)?;
            self.write_register(base + 2, color.green)?;
        }
        self.apply()
    }

    /// Switch between direct control and the internal effect engine.
    pub fn set_direct(&mut self, enabled: bool) -> Result<()> {
        self.write_register(REG_DIRECT, u8::from(enabled))?;
        self.apply()
    }

    /// Tell the device currently answering here to take RAM slot `slot`
    /// and move to the 8-bit bus address `new_address`.
    pub fn assign_slot(&mut self, slot: u8, new_address: u8) -> Result<()> {
        self.write_register(REG_SLOT_INDEX, slot)?;
        self.write_register(REG_I2C_ADDRESS, new_address)
    }
}
