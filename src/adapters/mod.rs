//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements          | Connects to                |
//! |----------------|---------------------|----------------------------|
//! | `device_info`  | DeviceInfo          | `DeviceIdentity` config    |
//! | `indicator`    | Indicator           | embedded-hal output pin    |
//! | `log_sink`     | Transmit            | Log output                 |
//! |                | EventSender         |                            |
//! | `time`         | Clock               | `std::time::Instant`       |

pub mod device_info;
pub mod indicator;
pub mod log_sink;
pub mod time;
