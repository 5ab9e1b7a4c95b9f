//! Application core: bus logic, zero I/O.
//!
//! [`service::BusService`] owns the client core, control service and
//! event pipe for one bus.  All interaction with the link layer and the
//! platform happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real hardware.

pub mod ports;
pub mod service;
