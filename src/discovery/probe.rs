//! Two-stage Aura presence test.
//!
//! 1. **Ack**: an SMBus quick write must be acknowledged.
//! 2. **Signature**: command codes `0xA0..=0xAF` must read back as
//!    `0x00..=0x0F`.  This counting pattern was observed in register dumps
//!    of every Aura part; it is not a documented identity field.
//!
//! All sixteen signature bytes are read even after a mismatch.  What the
//! reads do to the device is undocumented, so the read sequence stays the
//! same whether the address passes or not.

use log::debug;

use crate::app::ports::{QuickDirection, SmbusTransport};
use crate::bus::Address;

pub const SIGNATURE_BASE: u8 = 0xA0;
pub const SIGNATURE_LEN: u8 = 16;

/// Outcome of probing one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Nothing acknowledged the quick write.
    NoAck,
    /// Something answered, but `mismatches` of the 16 signature bytes were wrong.
    SignatureMismatch { mismatches: u8 },
    /// Both stages passed.
    Aura,
}

impl ProbeOutcome {
    pub fn is_aura(self) -> bool {
        matches!(self, Self::Aura)
    }
}

/// Run both probe stages against `address`.
pub fn probe(transport: &mut dyn SmbusTransport, address: Address) -> ProbeOutcome {
    if transport
        .write_quick(address.get(), QuickDirection::Write)
        .is_err()
    {
        debug!("probe {}: no ack", address);
        return ProbeOutcome::NoAck;
    }

    let mut mismatches = 0u8;
    for i in 0..SIGNATURE_LEN {
        // A failed read counts as a wrong byte.
        match transport.read_byte_data(address.get(), SIGNATURE_BASE + i) {
            Ok(v) if v == i => {}
            _ => mismatches += 1,
        }
    }

    if mismatches == 0 {
        debug!("probe {}: Aura signature ok", address);
        ProbeOutcome::Aura
    } else {
        debug!("probe {}: {} signature byte(s) wrong", address, mismatches);
        ProbeOutcome::SignatureMismatch { mismatches }
    }
}

/// `true` when an Aura controller answers at `address`.
pub fn is_aura_controller(transport: &mut dyn SmbusTransport, address: Address) -> bool {
    probe(transport, address).is_aura()
}
