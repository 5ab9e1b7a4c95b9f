//! Integration tests: control-service commands addressed to the local device.

use super::mock_host::MockHost;

use jdclient::BusService;
use jdclient::config::BusConfig;
use jdclient::control::IdentifyState;
use jdclient::packet::{
    CMD_IDENTIFY, CMD_RESET, CMD_SERVICES, Packet, REG_BOOTLOADER_FIRMWARE_IDENTIFIER,
    REG_DEVICE_DESCRIPTION, REG_FIRMWARE_IDENTIFIER, REG_FIRMWARE_VERSION, REG_MCU_TEMPERATURE,
    REG_UPTIME, get,
};

const LOCAL: u64 = 0x0102_0304_0506_0708;

fn command(bus: &mut BusService, host: &mut MockHost, cmd: u16) {
    bus.process_packet(&Packet::command(LOCAL, 0, cmd, &[]), host);
}

#[test]
fn identify_pulses_seven_times_then_stops() {
    let mut bus = BusService::new(LOCAL, &BusConfig::default());
    let mut host = MockHost::new();

    host.now_us = 10_000;
    command(&mut bus, &mut host, CMD_IDENTIFY);
    assert_eq!(bus.identify_state(), IdentifyState::Identifying { remaining: 6 });

    // Tick every 10 ms for two seconds.
    for step in 1..=200u64 {
        host.now_us = 10_000 + step * 10_000;
        bus.tick(&mut host);
    }

    let expected: Vec<u64> = (0..7).map(|i| 10_000 + i * 150_000).collect();
    assert_eq!(host.blinks, expected);
    assert_eq!(bus.identify_state(), IdentifyState::Idle);
}

#[test]
fn identify_reissued_restarts_without_stacking() {
    let mut bus = BusService::new(LOCAL, &BusConfig::default());
    let mut host = MockHost::new();

    command(&mut bus, &mut host, CMD_IDENTIFY);
    host.now_us = 150_000;
    bus.tick(&mut host);
    assert_eq!(bus.identify_state(), IdentifyState::Identifying { remaining: 5 });

    host.now_us = 200_000;
    command(&mut bus, &mut host, CMD_IDENTIFY);
    assert_eq!(bus.identify_state(), IdentifyState::Identifying { remaining: 6 });

    for step in 1..=100u64 {
        host.now_us = 200_000 + step * 10_000;
        bus.tick(&mut host);
    }
    // Two from the first run, seven from the second.
    assert_eq!(host.blinks.len(), 9);
}

#[test]
fn services_command_requests_announce() {
    let mut bus = BusService::new(LOCAL, &BusConfig::default());
    let mut host = MockHost::new();
    command(&mut bus, &mut host, CMD_SERVICES);
    assert_eq!(host.announces, 1);
    assert!(host.sent.is_empty());
}

#[test]
fn uptime_reports_clock_at_handling_time() {
    let mut bus = BusService::new(LOCAL, &BusConfig::default());
    let mut host = MockHost::new();

    host.now_us = 123_456_789;
    command(&mut bus, &mut host, get(REG_UPTIME));
    let sent = host.last_sent().unwrap();
    assert_eq!(sent.service_number, 0);
    assert_eq!(sent.command, get(REG_UPTIME));
    assert_eq!(sent.payload, 123_456_789u64.to_le_bytes().to_vec());

    host.now_us = 5;
    command(&mut bus, &mut host, get(REG_UPTIME));
    assert_eq!(host.last_sent().unwrap().payload, 5u64.to_le_bytes().to_vec());
}

#[test]
fn identity_registers_reply_with_host_values() {
    let mut bus = BusService::new(LOCAL, &BusConfig::default());
    let mut host = MockHost::new();

    command(&mut bus, &mut host, get(REG_DEVICE_DESCRIPTION));
    command(&mut bus, &mut host, get(REG_FIRMWARE_VERSION));
    command(&mut bus, &mut host, get(REG_FIRMWARE_IDENTIFIER));
    command(&mut bus, &mut host, get(REG_BOOTLOADER_FIRMWARE_IDENTIFIER));

    let payloads: Vec<Vec<u8>> = host.sent.iter().map(|s| s.payload.clone()).collect();
    assert_eq!(
        payloads,
        vec![
            b"mock sensor hub".to_vec(),
            b"v1.2.3".to_vec(),
            0x3A9B_0001u32.to_le_bytes().to_vec(),
            0x3A9B_0001u32.to_le_bytes().to_vec(),
        ]
    );
}

#[test]
fn temperature_only_when_enabled() {
    let mut host = MockHost::new();
    host.temperature = Some(-4);

    let mut bus = BusService::new(LOCAL, &BusConfig::default());
    command(&mut bus, &mut host, get(REG_MCU_TEMPERATURE));
    assert!(host.sent.is_empty());

    let config = BusConfig {
        report_mcu_temperature: true,
        ..BusConfig::default()
    };
    let mut bus = BusService::new(LOCAL, &config);
    command(&mut bus, &mut host, get(REG_MCU_TEMPERATURE));
    assert_eq!(host.last_sent().unwrap().payload, (-4i32).to_le_bytes().to_vec());
}

#[test]
fn unknown_commands_are_ignored() {
    let mut bus = BusService::new(LOCAL, &BusConfig::default());
    let mut host = MockHost::new();
    command(&mut bus, &mut host, 0x0083);
    command(&mut bus, &mut host, get(0x0199));
    assert!(host.sent.is_empty());
    assert_eq!(host.announces, 0);
}

#[test]
#[should_panic(expected = "target reset")]
fn reset_command_resets_target() {
    let mut bus = BusService::new(LOCAL, &BusConfig::default());
    let mut host = MockHost::new();
    command(&mut bus, &mut host, CMD_RESET);
}
