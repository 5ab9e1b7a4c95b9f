//! Log-based transmit adapter.
//!
//! Implements [`Transmit`] and [`EventSender`] by writing every outbound
//! frame to the logger instead of the wire.  Useful as a default when no
//! link layer is attached, and for tracing a bus session on the host.

use log::info;

use crate::app::ports::{EventSender, Transmit};
use crate::error::TransmitError;
use crate::evpipe::PipeTarget;

/// Largest payload a single bus frame can carry.
pub const MAX_PAYLOAD: usize = 236;

/// Adapter that logs every outbound frame and counts them.
#[derive(Default)]
pub struct LogTransmit {
    frames: u32,
}

impl LogTransmit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames "sent" so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

impl Transmit for LogTransmit {
    fn send(&mut self, service_number: u8, command: u16, payload: &[u8]) -> Result<(), TransmitError> {
        if payload.len() > MAX_PAYLOAD {
            return Err(TransmitError::PayloadTooLarge);
        }
        self.frames += 1;
        info!(
            "TX | svc={} cmd={:#06x} len={} | {:02x?}",
            service_number,
            command,
            payload.len(),
            payload
        );
        Ok(())
    }
}

impl EventSender for LogTransmit {
    fn send_event(&mut self, target: PipeTarget, seq: u16, event: &[u8]) -> Result<(), TransmitError> {
        if event.len() > MAX_PAYLOAD {
            return Err(TransmitError::PayloadTooLarge);
        }
        self.frames += 1;
        info!(
            "PIPE | {:016x}:{} #{} len={}",
            target.device_id,
            target.port,
            seq,
            event.len()
        );
        Ok(())
    }
}
