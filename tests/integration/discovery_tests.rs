//! Discovery integration tests: adapter filtering, slot remapping, and
//! probing, asserted against the recorded bus traffic.

use aura_smbus::adapters::sim::{SimBus, SimDevice};
use aura_smbus::app::events::{DiscoveryEvent, SkipReason};
use aura_smbus::config::DiscoveryConfig;
use aura_smbus::discovery::ControllerRegistry;

use crate::mock_hw::{MockAdapters, RecordingBus, RecordingSink, SmbusCall};

fn discover(adapters: &mut MockAdapters, sink: &mut RecordingSink) -> ControllerRegistry {
    ControllerRegistry::discover(adapters, &DiscoveryConfig::default(), sink)
}

#[test]
fn single_motherboard_controller_is_found_once() {
    let sim = SimBus::new();
    sim.attach(SimDevice::aura(0x4E));
    let bus = RecordingBus::new(sim);
    let mut sink = RecordingSink::new();

    let registry = discover(&mut MockAdapters::single(&bus), &mut sink);

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.controllers()[0].address.get(), 0x4E);
    assert_eq!(
        sink.count(|e| matches!(e, DiscoveryEvent::ControllerFound { .. })),
        1
    );
    assert_eq!(
        sink.events.last(),
        Some(&DiscoveryEvent::DiscoveryComplete { buses: 1, controllers: 1 })
    );
}

#[test]
fn every_candidate_gets_a_quick_write() {
    let bus = RecordingBus::new(SimBus::new());
    discover(&mut MockAdapters::single(&bus), &mut RecordingSink::new());

    let quick: Vec<u8> = bus
        .calls()
        .iter()
        .filter_map(|c| match c {
            SmbusCall::Quick { address } => Some(*address),
            _ => None,
        })
        .collect();
    // One failed remap attempt, then every probe address in order.
    assert_eq!(
        quick,
        vec![0x77, 0x70, 0x71, 0x72, 0x73, 0x74, 0x75, 0x76, 0x77, 0x40, 0x4E, 0x4F, 0x66]
    );
    assert_eq!(bus.calls().len(), 13);
}

#[test]
fn signature_mismatch_still_reads_all_sixteen_bytes() {
    let sim = SimBus::new();
    sim.attach(SimDevice::foreign(0x40));
    let bus = RecordingBus::new(sim);
    let registry = discover(&mut MockAdapters::single(&bus), &mut RecordingSink::new());

    assert!(registry.is_empty());
    let reads: Vec<u8> = bus
        .calls()
        .iter()
        .filter_map(|c| match c {
            SmbusCall::ReadByteData { address: 0x40, command } => Some(*command),
            _ => None,
        })
        .collect();
    assert_eq!(reads, (0xA0..=0xAF).collect::<Vec<u8>>());
}

#[test]
fn one_wrong_signature_byte_rejects_the_device() {
    let mut sig = [0u8; 16];
    for (i, b) in sig.iter_mut().enumerate() {
        *b = i as u8;
    }
    sig[15] = 0x10;
    let sim = SimBus::new();
    sim.attach(SimDevice::aura(0x66).with_signature(sig));
    let registry = discover(
        &mut MockAdapters::single(&RecordingBus::new(sim)),
        &mut RecordingSink::new(),
    );
    assert!(registry.is_empty());
}

#[test]
fn remap_writes_slot_then_address_for_each_module() {
    let sim = SimBus::new();
    sim.attach(SimDevice::aura_ram()).attach(SimDevice::aura_ram());
    let bus = RecordingBus::new(sim);
    let mut sink = RecordingSink::new();

    let registry = discover(&mut MockAdapters::single(&bus), &mut sink);

    let writes = bus.register_writes();
    assert_eq!(
        writes[..4].to_vec(),
        vec![(0x80F8, 0), (0x80F9, 0xE0), (0x80F8, 1), (0x80F9, 0xE2)]
    );
    let raw: Vec<u8> = registry.controllers().iter().map(|c| c.address.get()).collect();
    assert_eq!(raw, vec![0x70, 0x71]);
    assert_eq!(
        sink.count(|e| matches!(e, DiscoveryEvent::SlotRemapped { .. })),
        2
    );
    // Third quick write on the shared address goes unanswered and ends the loop.
    let shared_quicks = bus
        .calls()
        .iter()
        .take_while(|c| !matches!(c, SmbusCall::Quick { address: 0x70 }))
        .filter(|c| matches!(c, SmbusCall::Quick { address: 0x77 }))
        .count();
    assert_eq!(shared_quicks, 3);
}

#[test]
fn nvidia_adapter_is_never_opened() {
    let chipset_sim = SimBus::new();
    chipset_sim.attach(SimDevice::aura(0x4E));
    let gpu_sim = SimBus::new();
    gpu_sim.attach(SimDevice::aura(0x4E));
    let chipset = RecordingBus::new(chipset_sim);
    let gpu = RecordingBus::new(gpu_sim);

    let mut adapters = MockAdapters::new();
    adapters
        .add("i2c-0", "SMBus I801 adapter at f040", &chipset)
        .add("i2c-1", "NVIDIA i2c adapter 1 at 1:00.0", &gpu);
    let mut sink = RecordingSink::new();
    let registry = discover(&mut adapters, &mut sink);

    assert_eq!(adapters.open_calls.get(), 1);
    assert!(gpu.calls().is_empty());
    assert_eq!(registry.buses().len(), 1);
    assert_eq!(registry.len(), 1);
    assert!(sink.events.iter().any(|e| matches!(
        e,
        DiscoveryEvent::AdapterSkipped { reason: SkipReason::Excluded, .. }
    )));
}

#[test]
fn controllers_on_two_buses_keep_their_bus() {
    let a = SimBus::new();
    a.attach(SimDevice::aura(0x4E));
    let b = SimBus::new();
    b.attach(SimDevice::aura(0x4E));
    let mut adapters = MockAdapters::new();
    adapters
        .add("i2c-0", "SMBus I801 adapter at f040", &RecordingBus::new(a))
        .add("i2c-3", "SMBus PIIX4 adapter port 0", &RecordingBus::new(b));

    let registry = discover(&mut adapters, &mut RecordingSink::new());
    let buses: Vec<usize> = registry.controllers().iter().map(|c| c.bus.0).collect();
    assert_eq!(buses, vec![0, 1]);
}
