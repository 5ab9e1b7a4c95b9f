//! Bus client configuration parameters
//!
//! All tunable parameters for the local bus node.
//! Values can be overridden from a JSON document supplied by the
//! application at startup.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Identity strings and class reported by the control service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceIdentity {
    /// Human-readable device description.
    pub description: heapless::String<64>,
    /// Firmware version string.
    pub firmware_version: heapless::String<32>,
    /// Firmware / product identifier (device class).
    pub device_class: u32,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        let mut description = heapless::String::new();
        let _ = description.push_str("jdclient device");
        let mut firmware_version = heapless::String::new();
        let _ = firmware_version.push_str(env!("CARGO_PKG_VERSION"));
        Self {
            description,
            firmware_version,
            device_class: 0,
        }
    }
}

/// Core bus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    // --- Identify ---
    /// Minimum time between identify pulses (microseconds)
    pub identify_interval_us: u32,
    /// Duration of one identify pulse (microseconds)
    pub identify_blink_us: u32,

    // --- Event pipe ---
    /// Service number that accepts pipe-events subscriptions
    pub pipe_service_number: u8,

    // --- Control registers ---
    /// Answer MCU temperature register reads
    pub report_mcu_temperature: bool,

    pub identity: DeviceIdentity,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            // Identify
            identify_interval_us: 150_000, // 150 ms between pulses
            identify_blink_us: 50_000,     // 50 ms on

            // Event pipe
            pipe_service_number: 1,

            // Control registers
            report_mcu_temperature: false,

            identity: DeviceIdentity::default(),
        }
    }
}

impl BusConfig {
    /// Parse and validate a JSON config.  Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the control service and event pipe cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identify_interval_us == 0 {
            return Err(ConfigError::ValidationFailed(
                "identify_interval_us must be > 0",
            ));
        }
        if self.identify_blink_us >= self.identify_interval_us {
            return Err(ConfigError::ValidationFailed(
                "identify_blink_us must be shorter than identify_interval_us",
            ));
        }
        if self.pipe_service_number == 0 {
            return Err(ConfigError::ValidationFailed(
                "pipe_service_number 0 is the control service",
            ));
        }
        Ok(())
    }
}
