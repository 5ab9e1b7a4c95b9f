//! Bus service: the hexagonal core.
//!
//! [`BusService`] owns every piece of per-bus state: the device registry
//! and client table, the control service, and the event pipe.  It is the
//! single entry point the link layer calls for each received frame.
//!
//! ```text
//!                  ┌──────────────────────────┐
//!  Packet ───────▶ │        BusService        │ ──▶ client handlers
//!                  │  ClientCore · Control ·   │
//!  BusHost ◀────── │  EventPipe                │ ──▶ Transmit / Indicator
//!                  └──────────────────────────┘
//! ```
//!
//! Dispatch is single-threaded and runs each packet to completion; the
//! `&mut self` receiver is what keeps a handler from starting a second,
//! overlapping dispatch.

use log::{info, warn};

use crate::client::{ClientCore, ClientHandle, ClientHandler, Classification};
use crate::config::BusConfig;
use crate::control::{ControlService, IdentifyState};
use crate::evpipe::{EventPipe, PipeTarget};
use crate::packet::{Packet, SERVICE_NUMBER_CONTROL};

use super::ports::{BusHost, Clock, EventSender, Indicator};

// ───────────────────────────────────────────────────────────────
// BusService
// ───────────────────────────────────────────────────────────────

/// Owned context for one bus.
pub struct BusService {
    /// Id of the local device; commands addressed elsewhere are not ours.
    local_id: u64,
    clients: ClientCore,
    control: ControlService,
    pipe: EventPipe,
    packets: u64,
}

impl BusService {
    pub fn new(local_id: u64, config: &BusConfig) -> Self {
        info!(
            "bus: local device {:016x}, pipe on service {}",
            local_id, config.pipe_service_number
        );
        Self {
            local_id,
            clients: ClientCore::new(),
            control: ControlService::new(config),
            pipe: EventPipe::new(config.pipe_service_number),
            packets: 0,
        }
    }

    // ── Client API ────────────────────────────────────────────

    /// Register a client for `service_class`.  There is no unregister.
    pub fn register_client(
        &mut self,
        service_class: u32,
        handler: impl ClientHandler + 'static,
    ) -> ClientHandle {
        self.clients.register(service_class, handler)
    }

    // ── Per-packet dispatch ───────────────────────────────────

    /// Dispatch one received packet to completion.
    ///
    /// Every packet goes through the client core.  Commands addressed to
    /// the local device are additionally handed to the control service
    /// (service 0) or the event pipe.
    pub fn process_packet(&mut self, pkt: &Packet<'_>, host: &mut impl BusHost) -> Option<Classification> {
        self.packets += 1;
        let classification = self.clients.process_packet(pkt, host.now_us());

        if pkt.is_command && pkt.device_id == self.local_id {
            if pkt.service_number == SERVICE_NUMBER_CONTROL {
                self.control.handle_packet(pkt, host);
            } else if let Err(e) = self.pipe.handle_packet(pkt) {
                warn!("bus: pipe request rejected: {}", e);
            }
        }

        classification
    }

    // ── Periodic work ─────────────────────────────────────────

    /// Periodic hook; call from the main loop.  Drives the identify blink.
    pub fn tick(&mut self, host: &mut (impl Clock + Indicator)) {
        let now = host.now_us();
        self.control.process(now, host);
    }

    /// Forward a local event to the pipe subscriber, if any.
    ///
    /// Returns `Ok(false)` when nobody is subscribed.
    pub fn forward_event(&mut self, sender: &mut impl EventSender, event: &[u8]) -> crate::Result<bool> {
        Ok(self.pipe.forward(sender, event)?)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn local_id(&self) -> u64 {
        self.local_id
    }

    pub fn clients(&self) -> &ClientCore {
        &self.clients
    }

    pub fn identify_state(&self) -> IdentifyState {
        self.control.state()
    }

    pub fn pipe_target(&self) -> Option<PipeTarget> {
        self.pipe.target()
    }

    /// Total packets dispatched since construction.
    pub fn packet_count(&self) -> u64 {
        self.packets
    }
}
