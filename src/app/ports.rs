//! Port traits: the hexagonal boundary between the bus core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ BusService (domain)
//! ```
//!
//! Link-layer transmit, the platform clock, identity, reset and the status
//! light all live outside this crate.  The [`BusService`](super::service::BusService)
//! consumes them via generics, so the core never touches hardware directly.

use crate::error::TransmitError;
use crate::evpipe::PipeTarget;

// ───────────────────────────────────────────────────────────────
// Transmit port (domain → link layer)
// ───────────────────────────────────────────────────────────────

/// Queues a frame from the local device onto the bus.
pub trait Transmit {
    fn send(&mut self, service_number: u8, command: u16, payload: &[u8]) -> Result<(), TransmitError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time since boot.
pub trait Clock {
    fn now_us(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Device info port (register reads about the local device)
// ───────────────────────────────────────────────────────────────

/// Externally sourced facts about the local device.
pub trait DeviceInfo {
    fn description(&self) -> &str;

    fn firmware_version(&self) -> &str;

    /// Firmware / product identifier.
    fn device_class(&self) -> u32;

    /// Die temperature in °C, if the platform can measure it.
    fn mcu_temperature_c(&mut self) -> Option<i32> {
        None
    }
}

// ───────────────────────────────────────────────────────────────
// System control port
// ───────────────────────────────────────────────────────────────

/// Whole-device actions requested over the control service.
pub trait SystemControl {
    /// Queue a full announce of the local service list.
    fn announce_services(&mut self);

    /// Reset the target immediately.  Never returns.
    fn target_reset(&mut self) -> !;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (status light)
// ───────────────────────────────────────────────────────────────

/// The status light used for IDENTIFY.
pub trait Indicator {
    /// Light up for `duration_us`, then turn off on its own.
    fn blink(&mut self, duration_us: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sender (pipe forwarding)
// ───────────────────────────────────────────────────────────────

/// Forwards a local event to a pipe subscriber.  The record layout on
/// the wire belongs to the implementation.
pub trait EventSender {
    fn send_event(&mut self, target: PipeTarget, seq: u16, event: &[u8]) -> Result<(), TransmitError>;
}

// ───────────────────────────────────────────────────────────────
// Combined host
// ───────────────────────────────────────────────────────────────

/// Everything [`BusService::process_packet`](super::service::BusService::process_packet)
/// needs from the platform.
pub trait BusHost: Transmit + Clock + DeviceInfo + SystemControl + Indicator {}

impl<T> BusHost for T where T: Transmit + Clock + DeviceInfo + SystemControl + Indicator {}
