//! Register client tests through a discovered registry.

use aura_smbus::adapters::sim::{SimBus, SimDevice};
use aura_smbus::color::Color;
use aura_smbus::config::DiscoveryConfig;
use aura_smbus::discovery::ControllerRegistry;
use aura_smbus::drivers::aura::{REG_APPLY, REG_COLORS_DIRECT, REG_DIRECT};

use crate::mock_hw::{MockAdapters, RecordingBus, RecordingSink};

fn registry_over(bus: &RecordingBus) -> ControllerRegistry {
    ControllerRegistry::discover(
        &mut MockAdapters::single(bus),
        &DiscoveryConfig::default(),
        &mut RecordingSink::new(),
    )
}

#[test]
fn color_then_direct_mode_writes_expected_registers() {
    let sim = SimBus::new();
    sim.attach(SimDevice::aura(0x4E));
    let bus = RecordingBus::new(sim.clone());
    let mut registry = registry_over(&bus);
    bus.clear();

    let failures = registry.apply_color(Color::new(255, 0, 128));
    assert!(failures.is_empty());

    let mut expected = Vec::new();
    for led in 0..5u16 {
        let base = REG_COLORS_DIRECT + led * 3;
        expected.extend([(base, 255), (base + 1, 128), (base + 2, 0)]);
    }
    expected.push((REG_APPLY, 0x01));
    expected.push((REG_DIRECT, 0x01));
    expected.push((REG_APPLY, 0x01));
    assert_eq!(bus.register_writes(), expected);

    let dev = sim.device(0x4E).unwrap();
    assert_eq!(dev.register(REG_DIRECT), 1);
    assert_eq!(dev.register(REG_COLORS_DIRECT + 1), 128);
}

#[test]
fn controller_index_reads_back_through_the_window() {
    let sim = SimBus::new();
    sim.attach(SimDevice::aura(0x40).with_name("AUMA0-E6K5-0104"));
    let mut registry = registry_over(&RecordingBus::new(sim));

    let mut ctl = registry.controller(0).unwrap();
    assert_eq!(ctl.device_name().unwrap().as_str(), "AUMA0-E6K5-0104");
    ctl.write_register(0x8021, 0x42).unwrap();
    assert_eq!(ctl.read_register(0x8021).unwrap(), 0x42);
    assert!(registry.controller(1).is_err());
}

#[test]
fn unplugged_controller_is_reported_and_others_still_set() {
    let a = SimBus::new();
    a.attach(SimDevice::aura(0x4E));
    let b = SimBus::new();
    b.attach(SimDevice::aura(0x4E));
    let first = RecordingBus::new(a);
    let second = RecordingBus::new(b.clone());
    let mut adapters = MockAdapters::new();
    adapters
        .add("i2c-0", "SMBus I801 adapter at f040", &first)
        .add("i2c-1", "SMBus PIIX4 adapter port 0", &second);
    let mut registry = ControllerRegistry::discover(
        &mut adapters,
        &DiscoveryConfig::default(),
        &mut RecordingSink::new(),
    );
    assert_eq!(registry.len(), 2);

    first.set_unplugged(true);
    let failures = registry.apply_color(Color::new(1, 2, 3));
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].controller.bus.0, 0);
    assert_eq!(b.device(0x4E).unwrap().register(REG_DIRECT), 1);
}
