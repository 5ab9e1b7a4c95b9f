//! Packet envelope and wire constants.
//!
//! The link layer (framing, CRC) hands every received frame to the core as
//! a [`Packet`]: a borrowed view that is only valid for the duration of one
//! dispatch call.
//!
//! ```text
//! ┌──────────────────┬─────────┬──────────┬───────────┬──────────────┐
//! │ device id (u64)  │ svc num │ command  │ cmd/report│ payload (N B)│
//! │                  │  (u8)   │  (u16)   │   flag    │              │
//! └──────────────────┴─────────┴──────────┴───────────┴──────────────┘
//! ```
//!
//! For a *report* the device id names the sender; for a *command* it names
//! the destination.

/// Service number of the control service present on every device.
pub const SERVICE_NUMBER_CONTROL: u8 = 0;

/// Service class of the control service (always slot 0 of an announce).
pub const SERVICE_CLASS_CONTROL: u32 = 0x0000_0000;

/// Low bits of announce slot 0 hold the restart counter.
/// Devices count 1..=15 after boot and then hold at 15.
pub const ANNOUNCE_COUNTER_MASK: u32 = 0x0000_000F;

/// Size of one announce slot on the wire.
pub const SLOT_SIZE: usize = 4;

// ── Commands ──────────────────────────────────────────────────

/// Control `SERVICES`: a report is an announce, a command asks for one.
pub const CMD_SERVICES: u16 = 0x00;
/// Control `IDENTIFY`: blink the status light.
pub const CMD_IDENTIFY: u16 = 0x81;
/// Control `RESET`: reboot the device.
pub const CMD_RESET: u16 = 0x82;
/// Subscribe a remote (device, port) to forwarded events.
pub const CMD_PIPE_EVENTS: u16 = 0x90;

/// Register-read commands are `CMD_GET_REG | register`.
pub const CMD_GET_REG: u16 = 0x1000;

/// Command code of a register read.
pub const fn get(register: u16) -> u16 {
    CMD_GET_REG | register
}

// ── Control registers ─────────────────────────────────────────

pub const REG_DEVICE_DESCRIPTION: u16 = 0x180;
pub const REG_FIRMWARE_IDENTIFIER: u16 = 0x181;
pub const REG_MCU_TEMPERATURE: u16 = 0x182;
pub const REG_BOOTLOADER_FIRMWARE_IDENTIFIER: u16 = 0x184;
pub const REG_FIRMWARE_VERSION: u16 = 0x185;
pub const REG_UPTIME: u16 = 0x186;

// ───────────────────────────────────────────────────────────────
// Packet
// ───────────────────────────────────────────────────────────────

/// One received bus packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet<'a> {
    pub device_id: u64,
    pub service_number: u8,
    pub service_command: u16,
    /// `true` for a command (id = destination), `false` for a report.
    pub is_command: bool,
    pub payload: &'a [u8],
}

impl<'a> Packet<'a> {
    /// A report sent by `device_id`.
    pub fn report(device_id: u64, service_number: u8, service_command: u16, payload: &'a [u8]) -> Self {
        Self {
            device_id,
            service_number,
            service_command,
            is_command: false,
            payload,
        }
    }

    /// A command addressed to `device_id`.
    pub fn command(device_id: u64, service_number: u8, service_command: u16, payload: &'a [u8]) -> Self {
        Self {
            device_id,
            service_number,
            service_command,
            is_command: true,
            payload,
        }
    }

    /// An announce report: the sender's service list.
    pub fn is_announce(&self) -> bool {
        !self.is_command
            && self.service_number == SERVICE_NUMBER_CONTROL
            && self.service_command == CMD_SERVICES
    }
}
