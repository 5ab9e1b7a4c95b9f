//! Fuzz target: `EventPipe::handle_packet`
//!
//! Feeds arbitrary pipe-subscription payloads and asserts that short
//! requests are rejected without disturbing the current subscription.
//!
//! cargo fuzz run fuzz_pipe_request

#![no_main]

use jdclient::evpipe::{EventPipe, PIPE_REQUEST_SIZE};
use jdclient::packet::{CMD_PIPE_EVENTS, Packet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut pipe = EventPipe::new(1);
    let before = pipe.target();

    match pipe.handle_packet(&Packet::command(0, 1, CMD_PIPE_EVENTS, data)) {
        Ok(Some(target)) => {
            assert!(data.len() >= PIPE_REQUEST_SIZE);
            assert_eq!(pipe.target(), Some(target));
        }
        Ok(None) => unreachable!("pipe command must be handled"),
        Err(_) => {
            assert!(data.len() < PIPE_REQUEST_SIZE);
            assert_eq!(pipe.target(), before);
        }
    }
});
