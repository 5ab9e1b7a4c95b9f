//! Fuzz target: `DeviceRegistry::process_announce`
//!
//! Splits the input into a sequence of announce payloads from a handful
//! of device ids and asserts the registry never panics and never holds a
//! device whose list failed validation.
//!
//! cargo fuzz run fuzz_announce

#![no_main]

use jdclient::client::registry::DeviceRegistry;
use jdclient::client::services::{MAX_SLOTS, ServiceList};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut registry = DeviceRegistry::new();

    // First byte of each chunk picks the device, the rest is the payload.
    for chunk in data.split(|&b| b == 0xA5) {
        let Some((&id, payload)) = chunk.split_first() else {
            continue;
        };
        let before = registry.len();
        match registry.process_announce(u64::from(id & 0x07), payload, 0) {
            Ok(_) => assert!(ServiceList::validate(payload).is_ok()),
            Err(_) => assert_eq!(registry.len(), before, "rejected announce created a device"),
        }
    }

    for device in registry.iter() {
        let n = device.services().slot_count();
        assert!((1..=MAX_SLOTS).contains(&n));
    }
});
