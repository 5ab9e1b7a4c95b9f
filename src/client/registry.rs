//! Device registry and change detection.
//!
//! One [`Device`] per distinct device id ever seen announcing on the bus.
//! Every accepted announce is classified against the stored service list:
//!
//! | Stored list        | Incoming announce                     | Result      |
//! |--------------------|---------------------------------------|-------------|
//! | none (unknown id)  | valid                                 | `New`       |
//! | N slots            | N slots, same classes, counter ≥ old  | `Unchanged` |
//! | N slots            | N slots, same classes, counter < old  | `Changed`   |
//! | N slots            | other slot count or any class differs | `Changed`   |
//!
//! Records are never evicted, so a [`DeviceIndex`] stays valid for the
//! lifetime of the registry.

use log::{debug, info};

use crate::error::AnnounceError;

use super::ClientHandle;
use super::services::{Comparison, ServiceList};

/// Stable index of a device record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceIndex(usize);

/// Outcome of classifying an announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// First announce from this device id.
    New,
    /// Routine re-announce; only the slot-0 header was refreshed.
    Unchanged,
    /// Service list replaced (content change or device restart).
    Changed,
}

impl Classification {
    /// Whether attachments must be re-evaluated.
    pub fn is_change(self) -> bool {
        self != Self::Unchanged
    }
}

/// Result of [`DeviceRegistry::process_announce`].
#[derive(Debug)]
pub struct Announce {
    pub device: DeviceIndex,
    pub classification: Classification,
    /// Clients that were attached to the device before a `Changed` replace.
    pub detached: Vec<ClientHandle>,
}

/// A remote device as last announced.
#[derive(Debug)]
pub struct Device {
    id: u64,
    services: ServiceList,
    last_seen_us: u64,
    attached: Vec<ClientHandle>,
}

impl Device {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn services(&self) -> &ServiceList {
        &self.services
    }

    /// Monotonic time of the last accepted announce.
    pub fn last_seen_us(&self) -> u64 {
        self.last_seen_us
    }

    /// Clients currently attached to one of this device's services.
    pub fn attached(&self) -> &[ClientHandle] {
        &self.attached
    }

    pub(crate) fn attach(&mut self, client: ClientHandle) {
        self.attached.push(client);
    }
}

/// All devices seen on the bus.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify an announce from `id` and update the registry.
    ///
    /// A malformed payload is rejected before anything is touched: no
    /// device is created and no timestamp moves.  On `Changed` the
    /// device's attached set is drained into [`Announce::detached`] before
    /// the service list is replaced, so the caller can disconnect those
    /// clients against a consistent state.
    pub fn process_announce(
        &mut self,
        id: u64,
        payload: &[u8],
        now_us: u64,
    ) -> Result<Announce, AnnounceError> {
        ServiceList::validate(payload)?;

        let Some(index) = self.lookup(id) else {
            let services = ServiceList::parse(payload)?;
            info!(
                "device {:016x}: new, {} service(s)",
                id,
                services.slot_count() - 1
            );
            self.devices.push(Device {
                id,
                services,
                last_seen_us: now_us,
                attached: Vec::new(),
            });
            return Ok(Announce {
                device: DeviceIndex(self.devices.len() - 1),
                classification: Classification::New,
                detached: Vec::new(),
            });
        };

        let device = &mut self.devices[index.0];
        let comparison = device.services.compare(payload);
        if comparison == Comparison::Same {
            device.services.refresh_header(payload);
            device.last_seen_us = now_us;
            return Ok(Announce {
                device: index,
                classification: Classification::Unchanged,
                detached: Vec::new(),
            });
        }

        let services = ServiceList::parse(payload)?;
        match comparison {
            Comparison::Restarted => info!("device {:016x}: restarted", id),
            _ => info!(
                "device {:016x}: services changed ({} -> {} slots)",
                id,
                device.services.slot_count(),
                services.slot_count()
            ),
        }
        let detached = core::mem::take(&mut device.attached);
        if !detached.is_empty() {
            debug!("device {:016x}: detaching {} client(s)", id, detached.len());
        }
        device.services = services;
        device.last_seen_us = now_us;

        Ok(Announce {
            device: index,
            classification: Classification::Changed,
            detached,
        })
    }

    pub fn lookup(&self, id: u64) -> Option<DeviceIndex> {
        self.devices.iter().position(|d| d.id == id).map(DeviceIndex)
    }

    /// Device at `index`; `None` for an index minted by another registry.
    pub fn get(&self, index: DeviceIndex) -> Option<&Device> {
        self.devices.get(index.0)
    }

    /// Only for indices this registry just returned from `process_announce`.
    pub(crate) fn get_mut(&mut self, index: DeviceIndex) -> &mut Device {
        &mut self.devices[index.0]
    }

    /// Look up a device by id.
    pub fn device(&self, id: u64) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
