//! Device identity adapter.
//!
//! Serves the control-service identity registers (description, firmware
//! version, device class) from the static [`DeviceIdentity`] in the bus
//! configuration.  An optional temperature source is plugged in by
//! platforms that can read their die sensor.

use crate::app::ports::DeviceInfo;
use crate::config::DeviceIdentity;

/// Identity from configuration plus an optional temperature probe.
pub struct StaticDeviceInfo {
    identity: DeviceIdentity,
    temperature: Option<fn() -> i32>,
}

impl StaticDeviceInfo {
    pub fn new(identity: DeviceIdentity) -> Self {
        Self {
            identity,
            temperature: None,
        }
    }

    /// Report MCU temperature from `probe`.
    pub fn with_temperature(mut self, probe: fn() -> i32) -> Self {
        self.temperature = Some(probe);
        self
    }
}

impl DeviceInfo for StaticDeviceInfo {
    fn description(&self) -> &str {
        &self.identity.description
    }

    fn firmware_version(&self) -> &str {
        &self.identity.firmware_version
    }

    fn device_class(&self) -> u32 {
        self.identity.device_class
    }

    fn mcu_temperature_c(&mut self) -> Option<i32> {
        self.temperature.map(|probe| probe())
    }
}
