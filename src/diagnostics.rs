//! Bus occupancy scans and register dumps.
//!
//! Both are built from the same per-address and per-register reads the
//! discovery core uses, rendered as fixed-width hex tables and appended
//! to a text file by the binary.
//!
//! Occupancy table (one per bus, `i2cdetect` layout):
//!
//! ```text
//!      0  1  2  3  4  5  6  7  8  9  a  b  c  d  e  f
//! 00: -- -- -- -- -- -- -- -- -- -- -- -- -- -- -- --
//! 40: 40 -- -- -- -- -- -- -- -- -- -- -- -- -- 4e --
//! ```

use std::fmt::Write as _;
use std::io::Write as _;
use std::ops::RangeInclusive;
use std::path::Path;

use crate::app::ports::{QuickDirection, SmbusTransport};
use crate::drivers::aura::Controller;

// ── Occupancy scan ────────────────────────────────────────────

/// How to test an address for presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Receive-byte on EEPROM-ish ranges, quick write elsewhere.
    #[default]
    Auto,
    Quick,
    Read,
}

impl ScanMode {
    fn uses_read(self, address: u8) -> bool {
        match self {
            Self::Quick => false,
            Self::Read => true,
            // Quick writes can corrupt some EEPROMs; i2cdetect reads these.
            Self::Auto => matches!(address, 0x30..=0x37 | 0x50..=0x5F),
        }
    }
}

/// Which of the 128 addresses on one bus answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    present: [bool; 128],
}

impl Occupancy {
    pub fn is_present(&self, address: u8) -> bool {
        self.present.get(address as usize).copied().unwrap_or(false)
    }

    pub fn addresses(&self) -> Vec<u8> {
        (0..128u8).filter(|&a| self.present[a as usize]).collect()
    }

    /// 16 × 8 grid, one row per 16 addresses.
    pub fn render(&self) -> String {
        let mut out = String::from("   ");
        for col in 0..16 {
            let _ = write!(out, "  {:x}", col);
        }
        out.push('\n');

        for row in (0..128u8).step_by(16) {
            let _ = write!(out, "{:02x}: ", row);
            for col in 0..16u8 {
                let a = row + col;
                if self.present[a as usize] {
                    let _ = write!(out, "{:02x} ", a);
                } else {
                    out.push_str("-- ");
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Test every 7-bit address on one bus.
pub fn scan_bus(transport: &mut dyn SmbusTransport, mode: ScanMode) -> Occupancy {
    let mut present = [false; 128];
    for address in 0..128u8 {
        let ok = if mode.uses_read(address) {
            transport.read_byte(address).is_ok()
        } else {
            transport.write_quick(address, QuickDirection::Write).is_ok()
        };
        present[address as usize] = ok;
    }
    Occupancy { present }
}

// ── Register dump ─────────────────────────────────────────────

/// Contents of a run of controller registers.  Failed reads are `None`.
#[derive(Debug, Clone)]
pub struct RegisterDump {
    start: u16,
    values: Vec<Option<u8>>,
}

impl RegisterDump {
    pub fn get(&self, register: u16) -> Option<u8> {
        let offset = register.checked_sub(self.start)? as usize;
        self.values.get(offset).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn failed_reads(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Header plus one row per 16 registers, `??` for failed reads.
    pub fn render(&self) -> String {
        let mut out = String::from("     ");
        for col in 0..16 {
            let _ = write!(out, "  {:x}", col);
        }
        out.push('\n');

        for (i, chunk) in self.values.chunks(16).enumerate() {
            let row = u32::from(self.start) + (i as u32) * 16;
            let _ = write!(out, "{:04x}: ", row);
            for v in chunk {
                match v {
                    Some(b) => {
                        let _ = write!(out, "{:02x} ", b);
                    }
                    None => out.push_str("?? "),
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Read every register in `range`, keeping going past failures.
pub fn dump_register_range(controller: &mut Controller<'_>, range: RangeInclusive<u16>) -> RegisterDump {
    let start = *range.start();
    let values = range.map(|r| controller.read_register(r).ok()).collect();
    RegisterDump { start, values }
}

/// Read the whole 64K register space.
pub fn dump_registers(controller: &mut Controller<'_>) -> RegisterDump {
    dump_register_range(controller, 0x0000..=0xFFFF)
}

// ── Output ────────────────────────────────────────────────────

/// Append `text` to `path`, creating the file if needed.
pub fn append_to_file(path: &Path, text: &str) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(text.as_bytes())
}
