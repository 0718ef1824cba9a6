//! Mock SMBus adapters for integration tests.
//!
//! Wraps the in-memory simulator and records every transaction so tests
//! can assert on the exact bus traffic discovery and the register client
//! produce, without touching real `/dev/i2c-*` nodes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use aura_smbus::adapters::sim::SimBus;
use aura_smbus::app::events::DiscoveryEvent;
use aura_smbus::app::ports::{
    AdapterRegistry, EventSink, QuickDirection, SmbusTransport, TransportError,
};
use aura_smbus::bus::{AdapterInfo, AdapterKind};

// ── Transaction record ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum SmbusCall {
    Quick { address: u8 },
    ReadByte { address: u8 },
    ReadByteData { address: u8, command: u8 },
    WriteByteData { address: u8, command: u8, value: u8 },
    WriteWordData { address: u8, command: u8, value: u16 },
}

// ── RecordingBus ──────────────────────────────────────────────

/// A simulated bus that logs every call.  Clones share the log.
#[derive(Clone)]
pub struct RecordingBus {
    pub sim: SimBus,
    calls: Rc<RefCell<Vec<SmbusCall>>>,
    unplugged: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl RecordingBus {
    pub fn new(sim: SimBus) -> Self {
        Self { sim, calls: Rc::default(), unplugged: Rc::default() }
    }

    pub fn calls(&self) -> Vec<SmbusCall> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Every byte written through the register window, as
    /// `(register, value)` pairs in write order.
    pub fn register_writes(&self) -> Vec<(u16, u8)> {
        let mut selected = None;
        let mut out = Vec::new();
        for call in self.calls.borrow().iter() {
            match *call {
                SmbusCall::WriteWordData { command: 0x00, value, .. } => {
                    selected = Some(value.swap_bytes());
                }
                SmbusCall::WriteByteData { command: 0x01, value, .. } => {
                    if let Some(reg) = selected {
                        out.push((reg, value));
                    }
                }
                _ => {}
            }
        }
        out
    }

    /// While unplugged, every transaction is recorded and then NACKed.
    pub fn set_unplugged(&self, unplugged: bool) {
        self.unplugged.set(unplugged);
    }

    fn record(&self, call: SmbusCall) -> Result<(), TransportError> {
        self.calls.borrow_mut().push(call);
        if self.unplugged.get() { Err(TransportError::Nack) } else { Ok(()) }
    }
}

impl SmbusTransport for RecordingBus {
    fn write_quick(&mut self, address: u8, direction: QuickDirection) -> Result<(), TransportError> {
        self.record(SmbusCall::Quick { address })?;
        self.sim.write_quick(address, direction)
    }

    fn read_byte(&mut self, address: u8) -> Result<u8, TransportError> {
        self.record(SmbusCall::ReadByte { address })?;
        self.sim.read_byte(address)
    }

    fn read_byte_data(&mut self, address: u8, command: u8) -> Result<u8, TransportError> {
        self.record(SmbusCall::ReadByteData { address, command })?;
        self.sim.read_byte_data(address, command)
    }

    fn write_byte_data(&mut self, address: u8, command: u8, value: u8) -> Result<(), TransportError> {
        self.record(SmbusCall::WriteByteData { address, command, value })?;
        self.sim.write_byte_data(address, command, value)
    }

    fn write_word_data(&mut self, address: u8, command: u8, value: u16) -> Result<(), TransportError> {
        self.record(SmbusCall::WriteWordData { address, command, value })?;
        self.sim.write_word_data(address, command, value)
    }
}

// ── MockAdapters ──────────────────────────────────────────────

/// Adapter registry that counts how often it is listed and opened.
pub struct MockAdapters {
    adapters: Vec<(AdapterInfo, RecordingBus)>,
    pub list_calls: Cell<usize>,
    pub open_calls: Cell<usize>,
}

#[allow(dead_code)]
impl MockAdapters {
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
            list_calls: Cell::new(0),
            open_calls: Cell::new(0),
        }
    }

    /// A registry with one chipset adapter over `bus`.
    pub fn single(bus: &RecordingBus) -> Self {
        let mut adapters = Self::new();
        adapters.add("i2c-0", "SMBus I801 adapter at f040", bus);
        adapters
    }

    pub fn add(&mut self, node: &str, name: &str, bus: &RecordingBus) -> &mut Self {
        self.adapters
            .push((AdapterInfo::new(node, name, AdapterKind::I2c), bus.clone()));
        self
    }
}

impl AdapterRegistry for MockAdapters {
    fn list(&mut self) -> Vec<AdapterInfo> {
        self.list_calls.set(self.list_calls.get() + 1);
        self.adapters.iter().map(|(info, _)| info.clone()).collect()
    }

    fn open(&mut self, adapter: &AdapterInfo) -> Result<Box<dyn SmbusTransport>, TransportError> {
        self.open_calls.set(self.open_calls.get() + 1);
        self.adapters
            .iter()
            .find(|(info, _)| info.node == adapter.node)
            .map(|(_, bus)| Box::new(bus.clone()) as Box<dyn SmbusTransport>)
            .ok_or(TransportError::Io(2))
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<DiscoveryEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&DiscoveryEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &DiscoveryEvent) {
        self.events.push(event.clone());
    }
}
