//! Integration tests: announce → registry → client attachment.
//!
//! Drives `BusService::process_packet` with announce reports and checks
//! the Connect / Disconnect / Packet stream each client observes.

use super::mock_host::{MockHost, Seen, announce_payload, recorder, with_announce};

use jdclient::BusService;
use jdclient::client::Classification;
use jdclient::config::BusConfig;
use jdclient::packet::{CMD_SERVICES, Packet};

const LOCAL: u64 = 0xFEED_0000_0000_0001;
const CLASS_A: u32 = 0x1473_A263;
const CLASS_B: u32 = 0x1F14_0409;

fn bus() -> (BusService, MockHost) {
    (BusService::new(LOCAL, &BusConfig::default()), MockHost::new())
}

fn announce(
    bus: &mut BusService,
    host: &mut MockHost,
    id: u64,
    counter: u32,
    classes: &[u32],
) -> Option<Classification> {
    with_announce(id, counter, classes, |p| bus.process_packet(p, host))
}

#[test]
fn reboot_scenario_reconnects_client() {
    let (mut bus, mut host) = bus();
    let (rec, handler) = recorder();
    bus.register_client(CLASS_A, handler);

    assert_eq!(announce(&mut bus, &mut host, 0x1, 1, &[CLASS_A]), Some(Classification::New));
    assert_eq!(
        rec.borrow().seen,
        vec![Seen::Connect { device_id: 0x1, service_index: 1 }]
    );

    assert_eq!(announce(&mut bus, &mut host, 0x1, 2, &[CLASS_A]), Some(Classification::Unchanged));
    assert_eq!(rec.borrow().seen.len(), 1, "routine re-announce must be silent");

    // Counter went backwards: device restarted.
    assert_eq!(announce(&mut bus, &mut host, 0x1, 1, &[CLASS_A]), Some(Classification::Changed));
    assert_eq!(
        rec.borrow().seen,
        vec![
            Seen::Connect { device_id: 0x1, service_index: 1 },
            Seen::Disconnect,
            Seen::Connect { device_id: 0x1, service_index: 1 },
        ]
    );
}

#[test]
fn two_devices_give_independent_attachments() {
    let (mut bus, mut host) = bus();
    let (rec1, h1) = recorder();
    let (rec2, h2) = recorder();
    let c1 = bus.register_client(CLASS_A, h1);
    announce(&mut bus, &mut host, 0x10, 1, &[CLASS_A]);

    // Registered after 0x10 appeared, so only 0x20 can claim it.
    let c2 = bus.register_client(CLASS_A, h2);
    announce(&mut bus, &mut host, 0x20, 1, &[CLASS_B, CLASS_A]);

    assert_eq!(bus.clients().device_id_of(c1), Some(0x10));
    assert_eq!(bus.clients().device_id_of(c2), Some(0x20));
    assert_eq!(rec2.borrow().seen, vec![Seen::Connect { device_id: 0x20, service_index: 2 }]);

    // Restarting device 0x10 only touches the client attached to it.
    announce(&mut bus, &mut host, 0x10, 0, &[CLASS_A]);
    assert_eq!(
        rec1.borrow().seen,
        vec![
            Seen::Connect { device_id: 0x10, service_index: 1 },
            Seen::Disconnect,
            Seen::Connect { device_id: 0x10, service_index: 1 },
        ]
    );
    assert_eq!(rec2.borrow().seen.len(), 1);
}

#[test]
fn service_removed_leaves_client_unattached() {
    let (mut bus, mut host) = bus();
    let (rec, handler) = recorder();
    let c = bus.register_client(CLASS_A, handler);

    announce(&mut bus, &mut host, 0x1, 1, &[CLASS_A]);
    announce(&mut bus, &mut host, 0x1, 2, &[CLASS_B]);

    assert_eq!(
        rec.borrow().seen,
        vec![Seen::Connect { device_id: 0x1, service_index: 1 }, Seen::Disconnect]
    );
    assert!(bus.clients().client(c).unwrap().attachment().is_none());

    // Another device offering the class picks it up.
    announce(&mut bus, &mut host, 0x2, 1, &[CLASS_A]);
    assert_eq!(bus.clients().device_id_of(c), Some(0x2));
}

#[test]
fn freed_client_attaches_to_same_device_slot_after_change() {
    let (mut bus, mut host) = bus();
    let (rec, handler) = recorder();
    bus.register_client(CLASS_B, handler);

    announce(&mut bus, &mut host, 0x1, 1, &[CLASS_B]);
    announce(&mut bus, &mut host, 0x1, 2, &[CLASS_A, CLASS_B]);
    assert_eq!(
        rec.borrow().seen,
        vec![
            Seen::Connect { device_id: 0x1, service_index: 1 },
            Seen::Disconnect,
            Seen::Connect { device_id: 0x1, service_index: 2 },
        ]
    );
}

#[test]
fn attached_traffic_is_delivered_as_packet() {
    let (mut bus, mut host) = bus();
    let (rec, handler) = recorder();
    bus.register_client(CLASS_B, handler);
    announce(&mut bus, &mut host, 0x1, 1, &[CLASS_A, CLASS_B]);

    bus.process_packet(&Packet::report(0x1, 2, 0x0101, &[9]), &mut host);
    bus.process_packet(&Packet::report(0x1, 1, 0x0101, &[9]), &mut host);
    bus.process_packet(&Packet::report(0x2, 2, 0x0101, &[9]), &mut host);

    let r = rec.borrow();
    assert_eq!(
        r.seen,
        vec![
            Seen::Connect { device_id: 0x1, service_index: 2 },
            Seen::Packet { device_id: 0x1, service_number: 2, command: 0x0101 },
        ]
    );
    // One announce plus three data packets.
    assert_eq!(r.any_packets, 4);
}

#[test]
fn late_registered_client_waits_for_next_change() {
    let (mut bus, mut host) = bus();
    announce(&mut bus, &mut host, 0x1, 1, &[CLASS_A]);

    let (rec, handler) = recorder();
    let c = bus.register_client(CLASS_A, handler);
    announce(&mut bus, &mut host, 0x1, 2, &[CLASS_A]);
    assert!(rec.borrow().seen.is_empty());
    assert!(bus.clients().client(c).unwrap().attachment().is_none());

    announce(&mut bus, &mut host, 0x2, 1, &[CLASS_A]);
    assert_eq!(bus.clients().device_id_of(c), Some(0x2));
}

#[test]
fn malformed_announce_is_ignored() {
    let (mut bus, mut host) = bus();
    let (rec, handler) = recorder();
    bus.register_client(CLASS_A, handler);
    announce(&mut bus, &mut host, 0x1, 1, &[CLASS_A]);

    let mut bad = announce_payload(0, &[CLASS_B]);
    bad.push(0xFF);
    let class = bus.process_packet(&Packet::report(0x1, 0, CMD_SERVICES, &bad), &mut host);
    assert_eq!(class, None);

    let dev = bus.clients().registry().device(0x1).unwrap();
    assert_eq!(dev.services().find(CLASS_A), Some(1));
    assert_eq!(rec.borrow().seen.len(), 1);
    assert_eq!(rec.borrow().any_packets, 2);
}

#[test]
fn last_seen_tracks_every_announce() {
    let (mut bus, mut host) = bus();
    host.now_us = 1_000;
    announce(&mut bus, &mut host, 0x1, 1, &[CLASS_A]);
    host.now_us = 2_000;
    announce(&mut bus, &mut host, 0x1, 2, &[CLASS_A]);
    assert_eq!(bus.clients().registry().device(0x1).unwrap().last_seen_us(), 2_000);

    host.now_us = 3_000;
    bus.process_packet(&Packet::report(0x1, 1, 0x0101, &[]), &mut host);
    assert_eq!(bus.clients().registry().device(0x1).unwrap().last_seen_us(), 2_000);
}
