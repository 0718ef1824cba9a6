//! End-to-end runs of the application service.

use aura_smbus::adapters::sim::{SimBus, SimDevice};
use aura_smbus::app::service;
use aura_smbus::color::ChannelError;
use aura_smbus::config::DiscoveryConfig;
use aura_smbus::error::Error;

use crate::mock_hw::{MockAdapters, RecordingBus, RecordingSink};

fn board() -> RecordingBus {
    let sim = SimBus::new();
    sim.attach(SimDevice::aura(0x4E).with_name("AUMA0-E6K5-0106"))
        .attach(SimDevice::aura_ram());
    RecordingBus::new(sim)
}

#[test]
fn out_of_range_channel_never_lists_adapters() {
    let bus = board();
    let mut adapters = MockAdapters::single(&bus);
    let err = service::run(
        ["300", "0", "0"],
        &mut adapters,
        &DiscoveryConfig::default(),
        &mut RecordingSink::new(),
    )
    .unwrap_err();

    assert_eq!(err, Error::Channel(ChannelError::OutOfRange(300)));
    assert_eq!(adapters.list_calls.get(), 0);
    assert!(bus.calls().is_empty());
}

#[test]
fn malformed_channels_are_rejected() {
    let cases = [
        (["-1", "0", "0"], ChannelError::OutOfRange(-1)),
        (["0", "12abc", "0"], ChannelError::Trailing),
        (["0", "0", "blue"], ChannelError::Invalid),
        (["", "0", "0"], ChannelError::Invalid),
    ];
    for (args, want) in cases {
        let mut adapters = MockAdapters::single(&board());
        let err = service::run(
            args,
            &mut adapters,
            &DiscoveryConfig::default(),
            &mut RecordingSink::new(),
        )
        .unwrap_err();
        assert_eq!(err, Error::Channel(want), "args {:?}", args);
        assert_eq!(adapters.list_calls.get(), 0);
    }
}

#[test]
fn run_sets_every_controller_and_reports_json() {
    let bus = board();
    let mut adapters = MockAdapters::single(&bus);
    let (report, _registry) = service::run(
        ["255", "0", "128"],
        &mut adapters,
        &DiscoveryConfig::default(),
        &mut RecordingSink::new(),
    )
    .unwrap();

    assert!(report.all_succeeded());
    assert_eq!(report.controllers.len(), 2);
    assert_eq!(bus.sim.device(0x70).unwrap().register(0x8020), 1);
    assert_eq!(bus.sim.device(0x4E).unwrap().register(0x8000), 255);

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["color"]["red"], 255);
    assert_eq!(json["buses"][0]["node"], "i2c-0");
    assert_eq!(json["controllers"][1]["name"], "AUMA0-E6K5-0106");
}

#[test]
fn empty_machine_is_not_an_error() {
    let mut adapters = MockAdapters::new();
    let (report, registry) = service::run(
        ["1", "2", "3"],
        &mut adapters,
        &DiscoveryConfig::default(),
        &mut RecordingSink::new(),
    )
    .unwrap();
    assert!(registry.is_empty());
    assert!(report.buses.is_empty());
    assert_eq!(adapters.list_calls.get(), 1);
}
