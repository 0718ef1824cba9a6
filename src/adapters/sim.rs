//! In-memory simulated SMBus with Aura devices.
//!
//! ## Dual-target design
//!
//! On real machines the Linux adapter drives `/dev/i2c-*`.
//! On hosts without SMBus access (CI, `--simulate`), this adapter models
//! the bits of Aura behaviour discovery depends on:
//!
//! - quick-write acknowledges when any device sits at the address;
//! - command codes `0xA0..=0xAF` return the identity signature;
//! - the `0x00`/`0x01`/`0x81` register window over a 64K register file;
//! - RAM-class devices move to `value >> 1` when their `I2C_ADDRESS`
//!   register is written, and several may share one address until then.
//!
//! When several devices share an address, the first one attached answers.

use std::cell::RefCell;
use std::rc::Rc;

use crate::app::ports::{AdapterRegistry, QuickDirection, SmbusTransport, TransportError};
use crate::bus::{AdapterInfo, AdapterKind};
use crate::drivers::aura::{REG_DEVICE_NAME, REG_I2C_ADDRESS};

const SIGNATURE_BASE: u8 = 0xA0;
const AURA_SIGNATURE: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
const EACCES: i32 = 13;

// ── SimDevice ─────────────────────────────────────────────────

/// One simulated slave device.
#[derive(Clone)]
pub struct SimDevice {
    address: u8,
    signature: [u8; 16],
    registers: Box<[u8]>,
    pointer: u16,
    relocatable: bool,
}

impl SimDevice {
    /// An Aura controller at a fixed address.
    pub fn aura(address: u8) -> Self {
        Self {
            address,
            signature: AURA_SIGNATURE,
            registers: vec![0u8; 0x1_0000].into_boxed_slice(),
            pointer: 0,
            relocatable: false,
        }
    }

    /// An Aura RAM controller waiting at the shared address `0x77`.
    pub fn aura_ram() -> Self {
        Self {
            relocatable: true,
            ..Self::aura(0x77)
        }
    }

    /// A device that acknowledges but is not an Aura controller.
    pub fn foreign(address: u8) -> Self {
        Self {
            signature: [0xFF; 16],
            ..Self::aura(address)
        }
    }

    pub fn with_signature(mut self, signature: [u8; 16]) -> Self {
        self.signature = signature;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        let start = REG_DEVICE_NAME as usize;
        for (i, b) in name.bytes().take(16).enumerate() {
            self.registers[start + i] = b;
        }
        self
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Current contents of a register, without bus traffic.
    pub fn register(&self, register: u16) -> u8 {
        self.registers[register as usize]
    }

    fn read_command(&self, command: u8) -> u8 {
        match command {
            0x81 => self.registers[self.pointer as usize],
            c if (SIGNATURE_BASE..SIGNATURE_BASE + 16).contains(&c) => {
                self.signature[(c - SIGNATURE_BASE) as usize]
            }
            _ => 0,
        }
    }

    fn write_command(&mut self, command: u8, value: u8) {
        if command != 0x01 {
            return;
        }
        self.registers[self.pointer as usize] = value;
        if self.relocatable && self.pointer == REG_I2C_ADDRESS {
            self.address = value >> 1;
        }
    }
}

// ── SimBus ────────────────────────────────────────────────────

#[derive(Default)]
struct SimState {
    devices: Vec<SimDevice>,
    transactions: usize,
}

/// A simulated bus holding any number of devices.
///
/// Clones are handles onto the same bus, so a test can keep one while
/// discovery owns another.
#[derive(Clone, Default)]
pub struct SimBus {
    state: Rc<RefCell<SimState>>,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, device: SimDevice) -> &Self {
        self.state.borrow_mut().devices.push(device);
        self
    }

    /// Snapshot of the first device currently answering at `address`.
    pub fn device(&self, address: u8) -> Option<SimDevice> {
        self.state
            .borrow()
            .devices
            .iter()
            .find(|d| d.address == address)
            .cloned()
    }

    /// Current address of every attached device, in attach order.
    pub fn addresses(&self) -> Vec<u8> {
        self.state.borrow().devices.iter().map(|d| d.address).collect()
    }

    /// Bus transactions issued so far.
    pub fn transactions(&self) -> usize {
        self.state.borrow().transactions
    }

    fn with_target<R>(
        &mut self,
        address: u8,
        f: impl FnOnce(&mut SimDevice) -> R,
    ) -> Result<R, TransportError> {
        let mut state = self.state.borrow_mut();
        state.transactions += 1;
        if address > 0x7F {
            return Err(TransportError::InvalidAddress(address));
        }
        state
            .devices
            .iter_mut()
            .find(|d| d.address == address)
            .map(f)
            .ok_or(TransportError::Nack)
    }
}

impl SmbusTransport for SimBus {
    fn write_quick(&mut self, address: u8, _direction: QuickDirection) -> Result<(), TransportError> {
        self.with_target(address, |_| ())
    }

    fn read_byte(&mut self, address: u8) -> Result<u8, TransportError> {
        self.with_target(address, |_| 0)
    }

    fn read_byte_data(&mut self, address: u8, command: u8) -> Result<u8, TransportError> {
        self.with_target(address, |d| d.read_command(command))
    }

    fn write_byte_data(&mut self, address: u8, command: u8, value: u8) -> Result<(), TransportError> {
        self.with_target(address, |d| d.write_command(command, value))
    }

    fn write_word_data(&mut self, address: u8, command: u8, value: u16) -> Result<(), TransportError> {
        self.with_target(address, |d| {
            if command == 0x00 {
                d.pointer = value.swap_bytes();
            }
        })
    }
}

// ── SimAdapterRegistry ────────────────────────────────────────

/// Adapter list backed by simulated buses.
#[derive(Default)]
pub struct SimAdapterRegistry {
    adapters: Vec<(AdapterInfo, Option<SimBus>)>,
}

impl SimAdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter that opens onto `bus`.
    pub fn add(&mut self, info: AdapterInfo, bus: SimBus) -> &mut Self {
        self.adapters.push((info, Some(bus)));
        self
    }

    /// Register an adapter whose device node cannot be opened.
    pub fn add_unopenable(&mut self, info: AdapterInfo) -> &mut Self {
        self.adapters.push((info, None));
        self
    }

    /// A desktop-like layout: chipset SMBus with a motherboard controller,
    /// two Aura DIMMs and an SPD EEPROM, plus a GPU adapter that must be
    /// skipped.
    pub fn demo_board() -> Self {
        let chipset = SimBus::new();
        chipset
            .attach(SimDevice::aura(0x4E).with_name("AUMA0-E6K5-0106"))
            .attach(SimDevice::aura_ram().with_name("DIMM_LED-0102"))
            .attach(SimDevice::aura_ram().with_name("DIMM_LED-0102"))
            .attach(SimDevice::foreign(0x50));

        let gpu = SimBus::new();
        gpu.attach(SimDevice::aura(0x4E));

        let mut registry = Self::new();
        registry
            .add(
                AdapterInfo::new("i2c-0", "SMBus I801 adapter at f040", AdapterKind::I2c),
                chipset,
            )
            .add(
                AdapterInfo::new("i2c-1", "NVIDIA i2c adapter 1 at 1:00.0", AdapterKind::I2c),
                gpu,
            );
        registry
    }
}

impl AdapterRegistry for SimAdapterRegistry {
    fn list(&mut self) -> Vec<AdapterInfo> {
        self.adapters.iter().map(|(info, _)| info.clone()).collect()
    }

    fn open(&mut self, adapter: &AdapterInfo) -> Result<Box<dyn SmbusTransport>, TransportError> {
        let slot = self
            .adapters
            .iter_mut()
            .find(|(info, _)| info.node == adapter.node)
            .ok_or(TransportError::Io(EACCES))?;
        match &slot.1 {
            Some(bus) => Ok(Box::new(bus.clone())),
            None => Err(TransportError::Io(EACCES)),
        }
    }
}
