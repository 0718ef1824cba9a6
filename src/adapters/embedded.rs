//! SMBus transactions over any `embedded-hal` I2C bus.
//!
//! Lets the discovery core run on buses the host does not expose through
//! i2c-dev (USB bridges, MCU peripherals, `linux-embedded-hal`).  SMBus
//! framing is rebuilt from plain I2C operations:
//!
//! | SMBus           | I2C                                  |
//! |-----------------|--------------------------------------|
//! | quick write     | zero-length write                    |
//! | quick read      | zero-length read                     |
//! | receive byte    | 1-byte read                          |
//! | read byte data  | write `[cmd]`, repeated start, read 1|
//! | write byte data | write `[cmd, value]`                 |
//! | write word data | write `[cmd, lo, hi]`                |

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use crate::app::ports::{QuickDirection, SmbusTransport, TransportError};

fn map_err<E: embedded_hal::i2c::Error>(e: &E) -> TransportError {
    match e.kind() {
        ErrorKind::NoAcknowledge(_) => TransportError::Nack,
        _ => TransportError::Bus,
    }
}

fn check(address: u8) -> Result<u8, TransportError> {
    if address > 0x7F { Err(TransportError::InvalidAddress(address)) } else { Ok(address) }
}

/// Adapter from an `embedded_hal::i2c::I2c` bus to [`SmbusTransport`].
pub struct EmbeddedHalSmbus<I> {
    i2c: I,
}

impl<I: I2c> EmbeddedHalSmbus<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    pub fn into_inner(self) -> I {
        self.i2c
    }
}

impl<I: I2c> SmbusTransport for EmbeddedHalSmbus<I> {
    fn write_quick(&mut self, address: u8, direction: QuickDirection) -> Result<(), TransportError> {
        let address = check(address)?;
        let result = match direction {
            QuickDirection::Write => self.i2c.write(address, &[]),
            QuickDirection::Read => self.i2c.read(address, &mut []),
        };
        result.map_err(|e| map_err(&e))
    }

    fn read_byte(&mut self, address: u8) -> Result<u8, TransportError> {
        let mut buf = [0u8; 1];
        self.i2c
            .read(check(address)?, &mut buf)
            .map_err(|e| map_err(&e))?;
        Ok(buf[0])
    }

    fn read_byte_data(&mut self, address: u8, command: u8) -> Result<u8, TransportError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(check(address)?, &[command], &mut buf)
            .map_err(|e| map_err(&e))?;
        Ok(buf[0])
    }

    fn write_byte_data(&mut self, address: u8, command: u8, value: u8) -> Result<(), TransportError> {
        self.i2c
            .write(check(address)?, &[command, value])
            .map_err(|e| map_err(&e))
    }

    fn write_word_data(&mut self, address: u8, command: u8, value: u16) -> Result<(), TransportError> {
        let [lo, hi] = value.to_le_bytes();
        self.i2c
            .write(check(address)?, &[command, lo, hi])
            .map_err(|e| map_err(&e))
    }
}
