//! Control service (service number 0) for the local device.
//!
//! Handles bus-wide commands about this device: re-announce, identify,
//! reset, and read-only registers (description, firmware version and
//! identifiers, uptime, MCU temperature).
//!
//! ## Identify state machine
//!
//! ```text
//!            IDENTIFY (counter = 7)
//!   ┌──────┐ ─────────────────────▶ ┌─────────────┐ ──┐ IDENTIFY
//!   │ Idle │                        │ Identifying │ ◀─┘ (restart at 7)
//!   └──────┘ ◀───────────────────── └─────────────┘
//!              last pulse consumed
//! ```
//!
//! Each pulse consumes one count once the inter-pulse interval has
//! elapsed; ticking while idle is a no-op.

use log::{info, trace, warn};

use crate::app::ports::{BusHost, Indicator};
use crate::config::BusConfig;
use crate::packet::{
    CMD_IDENTIFY, CMD_RESET, CMD_SERVICES, Packet, REG_BOOTLOADER_FIRMWARE_IDENTIFIER,
    REG_DEVICE_DESCRIPTION, REG_FIRMWARE_IDENTIFIER, REG_FIRMWARE_VERSION, REG_MCU_TEMPERATURE,
    REG_UPTIME, SERVICE_NUMBER_CONTROL, get,
};

/// Status-light pulses per IDENTIFY command.
pub const IDENTIFY_PULSES: u8 = 7;

/// Observable identify state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifyState {
    Idle,
    Identifying { remaining: u8 },
}

/// Control-service handler.
pub struct ControlService {
    interval_us: u32,
    blink_us: u32,
    report_temperature: bool,
    /// Pulses left in the current identify run.
    id_counter: u8,
    /// Earliest time of the next pulse.
    next_blink_us: u64,
}

impl ControlService {
    pub fn new(config: &BusConfig) -> Self {
        Self {
            interval_us: config.identify_interval_us,
            blink_us: config.identify_blink_us,
            report_temperature: config.report_mcu_temperature,
            id_counter: 0,
            next_blink_us: 0,
        }
    }

    /// Handle a control command addressed to the local device.
    pub fn handle_packet(&mut self, pkt: &Packet<'_>, host: &mut impl BusHost) {
        let cmd = pkt.service_command;
        match cmd {
            CMD_SERVICES => host.announce_services(),

            CMD_IDENTIFY => {
                let now = host.now_us();
                self.start_identify(now, host);
            }

            CMD_RESET => {
                warn!("control: reset requested");
                host.target_reset();
            }

            c if c == get(REG_DEVICE_DESCRIPTION) => {
                let text = host.description().as_bytes().to_vec();
                reply(host, cmd, &text);
            }

            c if c == get(REG_FIRMWARE_VERSION) => {
                let text = host.firmware_version().as_bytes().to_vec();
                reply(host, cmd, &text);
            }

            c if c == get(REG_FIRMWARE_IDENTIFIER) || c == get(REG_BOOTLOADER_FIRMWARE_IDENTIFIER) => {
                let class = host.device_class();
                reply(host, cmd, &class.to_le_bytes());
            }

            c if c == get(REG_UPTIME) => {
                let t = host.now_us();
                reply(host, cmd, &t.to_le_bytes());
            }

            c if c == get(REG_MCU_TEMPERATURE) && self.report_temperature => {
                if let Some(t) = host.mcu_temperature_c() {
                    reply(host, cmd, &t.to_le_bytes());
                }
            }

            other => trace!("control: ignoring command {:#06x}", other),
        }
    }

    /// Periodic tick: emit the next identify pulse when due.
    pub fn process(&mut self, now_us: u64, led: &mut impl Indicator) {
        self.identify(now_us, led);
    }

    pub fn state(&self) -> IdentifyState {
        match self.id_counter {
            0 => IdentifyState::Idle,
            remaining => IdentifyState::Identifying { remaining },
        }
    }

    // ── Internal ──────────────────────────────────────────────

    /// (Re)start an identify run; the first pulse fires immediately.
    fn start_identify(&mut self, now_us: u64, led: &mut impl Indicator) {
        info!("control: identify ({} pulses)", IDENTIFY_PULSES);
        self.id_counter = IDENTIFY_PULSES;
        self.next_blink_us = now_us;
        self.identify(now_us, led);
    }

    fn identify(&mut self, now_us: u64, led: &mut impl Indicator) {
        if self.id_counter == 0 {
            return;
        }
        if !self.should_pulse(now_us) {
            return;
        }

        self.id_counter -= 1;
        led.blink(self.blink_us);
        if self.id_counter == 0 {
            info!("control: identify done");
        }
    }

    /// Advance the pulse deadline by one interval, resyncing to `now` if
    /// the caller fell more than one interval behind.
    fn should_pulse(&mut self, now_us: u64) -> bool {
        if self.next_blink_us > now_us {
            return false;
        }
        self.next_blink_us += u64::from(self.interval_us);
        if self.next_blink_us <= now_us {
            self.next_blink_us = now_us + u64::from(self.interval_us);
        }
        true
    }
}

fn reply(host: &mut impl BusHost, cmd: u16, payload: &[u8]) {
    if let Err(e) = host.send(SERVICE_NUMBER_CONTROL, cmd, payload) {
        warn!("control: reply {:#06x} dropped: {}", cmd, e);
    }
}
