//! Event pipe subscriber.
//!
//! A remote endpoint subscribes to this device's events by sending a
//! `PIPE_EVENTS` command carrying the (device, port) it wants events
//! forwarded to.  Only one subscription is active at a time; a new request
//! replaces the old one and restarts the sequence counter.
//!
//! Request payload:
//! ```text
//! ┌──────────────────────┬───────────┐
//! │ device id (u64 LE)   │ port (u16)│
//! └──────────────────────┴───────────┘
//! ```

use log::{debug, info};

use crate::app::ports::EventSender;
use crate::error::{PipeError, TransmitError};
use crate::packet::{CMD_PIPE_EVENTS, Packet};

/// Size of the subscription record; longer payloads are accepted and the
/// tail ignored.
pub const PIPE_REQUEST_SIZE: usize = 10;

/// Destination of forwarded events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipeTarget {
    pub device_id: u64,
    pub port: u16,
}

impl PipeTarget {
    /// Decode a subscription record.
    pub fn decode(payload: &[u8]) -> Result<Self, PipeError> {
        if payload.len() < PIPE_REQUEST_SIZE {
            return Err(PipeError::TooShort { len: payload.len() });
        }
        let mut id = [0u8; 8];
        id.copy_from_slice(&payload[..8]);
        Ok(Self {
            device_id: u64::from_le_bytes(id),
            port: u16::from_le_bytes([payload[8], payload[9]]),
        })
    }
}

/// Single-slot pipe subscription.
pub struct EventPipe {
    service_number: u8,
    target: Option<PipeTarget>,
    counter: u16,
}

impl EventPipe {
    /// Accept subscriptions addressed to `service_number`.
    pub fn new(service_number: u8) -> Self {
        Self {
            service_number,
            target: None,
            counter: 0,
        }
    }

    /// Handle a command for the local device.
    ///
    /// Returns `Ok(Some(target))` when a subscription was stored and
    /// `Ok(None)` when the packet is not a pipe request.  A short request
    /// leaves any existing subscription untouched.
    pub fn handle_packet(&mut self, pkt: &Packet<'_>) -> Result<Option<PipeTarget>, PipeError> {
        if pkt.service_number != self.service_number || pkt.service_command != CMD_PIPE_EVENTS {
            return Ok(None);
        }

        let target = PipeTarget::decode(pkt.payload)?;
        self.target = Some(target);
        self.counter = 0;
        info!(
            "evpipe: subscribed {:016x}:{}",
            target.device_id, target.port
        );
        Ok(Some(target))
    }

    /// Current subscription and the sequence number to stamp on the next
    /// forwarded event.
    pub fn next_target(&mut self) -> Option<(PipeTarget, u16)> {
        let target = self.target?;
        let seq = self.counter;
        self.counter = self.counter.wrapping_add(1);
        Some((target, seq))
    }

    /// Forward `event` to the subscriber, if there is one.
    ///
    /// Returns `Ok(false)` when nobody is subscribed.
    pub fn forward(&mut self, sender: &mut impl EventSender, event: &[u8]) -> Result<bool, TransmitError> {
        let Some((target, seq)) = self.next_target() else {
            return Ok(false);
        };
        debug!("evpipe: event #{} -> {:016x}:{}", seq, target.device_id, target.port);
        sender.send_event(target, seq, event)?;
        Ok(true)
    }

    pub fn target(&self) -> Option<PipeTarget> {
        self.target
    }

    /// Drop the subscription.
    pub fn clear(&mut self) {
        self.target = None;
        self.counter = 0;
    }
}
