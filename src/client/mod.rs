//! Client subscription table and packet dispatch.
//!
//! A client is a local subscriber interested in one service class no
//! matter which device currently provides it.  The dispatcher attaches
//! each unattached client to the first matching slot of a freshly
//! (re)announced device and routes that slot's traffic to it.
//!
//! ```text
//!                 ┌───────────────────┐
//!  Packet ──────▶ │   ClientCore      │
//!                 │                   │──▶ Disconnect / Connect  (announce)
//!                 │  DeviceRegistry   │──▶ AnyPacket             (every client)
//!                 │  clients: Vec<_>  │──▶ Packet                (attached slot)
//!                 └───────────────────┘
//! ```
//!
//! Devices and clients refer to each other by index only ([`DeviceIndex`],
//! [`ClientHandle`]); neither table ever shrinks, so indices never dangle.
//! Handlers receive nothing but their own state, so they cannot re-enter
//! dispatch while the attached sets are being rewritten.

pub mod registry;
pub mod services;

use log::{debug, info};

use crate::packet::Packet;

pub use registry::{Classification, Device, DeviceIndex, DeviceRegistry};
pub use services::ServiceList;

// ───────────────────────────────────────────────────────────────
// Handler capability
// ───────────────────────────────────────────────────────────────

/// Stable handle of a registered client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientHandle(usize);

impl ClientHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Event delivered to a client handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientEvent<'a> {
    /// Attached to `service_index` on `device_id`.
    Connect { device_id: u64, service_index: u8 },
    /// The attachment was dropped (device changed or restarted).
    Disconnect,
    /// Traffic from the attached (device, service).
    Packet(&'a Packet<'a>),
    /// Every packet seen on the bus, attached or not.
    AnyPacket(&'a Packet<'a>),
}

/// Status returned by a handler.  Reserved for client use; the
/// dispatcher ignores it.
pub type HandlerStatus = i32;

/// A client's event callback.  The implementing value is the client's
/// user context.
pub trait ClientHandler {
    fn on_event(&mut self, client: ClientHandle, event: ClientEvent<'_>) -> HandlerStatus;
}

impl<F> ClientHandler for F
where
    F: FnMut(ClientHandle, ClientEvent<'_>) -> HandlerStatus,
{
    fn on_event(&mut self, client: ClientHandle, event: ClientEvent<'_>) -> HandlerStatus {
        self(client, event)
    }
}

// ───────────────────────────────────────────────────────────────
// Client record
// ───────────────────────────────────────────────────────────────

/// Binding between a client and one remote (device, service).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachment {
    pub device: DeviceIndex,
    pub service_index: u8,
}

pub struct Client {
    service_class: u32,
    attachment: Option<Attachment>,
    handler: Box<dyn ClientHandler>,
}

impl Client {
    pub fn service_class(&self) -> u32 {
        self.service_class
    }

    pub fn attachment(&self) -> Option<Attachment> {
        self.attachment
    }

    fn notify(&mut self, handle: ClientHandle, event: ClientEvent<'_>) {
        // Status is reserved for the client.
        let _ = self.handler.on_event(handle, event);
    }
}

impl core::fmt::Debug for Client {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Client")
            .field("service_class", &format_args!("{:#010x}", self.service_class))
            .field("attachment", &self.attachment)
            .finish_non_exhaustive()
    }
}

// ───────────────────────────────────────────────────────────────
// ClientCore
// ───────────────────────────────────────────────────────────────

/// Device registry plus client table, driven one packet at a time.
#[derive(Debug, Default)]
pub struct ClientCore {
    registry: DeviceRegistry,
    clients: Vec<Client>,
}

impl ClientCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client for `service_class`.  It starts unattached and is
    /// considered at the next announce that changes or introduces a device.
    pub fn register(&mut self, service_class: u32, handler: impl ClientHandler + 'static) -> ClientHandle {
        let handle = ClientHandle(self.clients.len());
        self.clients.push(Client {
            service_class,
            attachment: None,
            handler: Box::new(handler),
        });
        debug!("client {}: registered for class {:#010x}", handle.0, service_class);
        handle
    }

    /// Dispatch one received packet to completion.
    ///
    /// Returns the announce classification when `pkt` was an accepted
    /// announce.
    pub fn process_packet(&mut self, pkt: &Packet<'_>, now_us: u64) -> Option<Classification> {
        let mut classification = None;

        if pkt.is_announce() {
            match self.registry.process_announce(pkt.device_id, pkt.payload, now_us) {
                Ok(announce) => {
                    if announce.classification.is_change() {
                        self.disconnect(&announce.detached);
                        self.connect(announce.device);
                    }
                    classification = Some(announce.classification);
                }
                Err(e) => debug!("device {:016x}: announce ignored: {}", pkt.device_id, e),
            }
        }

        for (i, client) in self.clients.iter_mut().enumerate() {
            client.notify(ClientHandle(i), ClientEvent::AnyPacket(pkt));
        }

        if !pkt.is_announce() {
            self.deliver(pkt);
        }

        classification
    }

    /// Clear the attachment of every detached client, then notify each.
    fn disconnect(&mut self, detached: &[ClientHandle]) {
        for handle in detached {
            self.clients[handle.0].attachment = None;
        }
        for &handle in detached {
            info!("client {}: disconnected", handle.0);
            self.clients[handle.0].notify(handle, ClientEvent::Disconnect);
        }
    }

    /// Attach every unattached client whose class the device now hosts.
    fn connect(&mut self, index: DeviceIndex) {
        let device = self.registry.get_mut(index);
        let device_id = device.id();

        for (i, client) in self.clients.iter_mut().enumerate() {
            if client.attachment.is_some() {
                continue;
            }
            let Some(service_index) = device.services().find(client.service_class) else {
                continue;
            };

            let handle = ClientHandle(i);
            client.attachment = Some(Attachment {
                device: index,
                service_index,
            });
            device.attach(handle);
            info!(
                "client {}: connected to {:016x}/{}",
                i, device_id, service_index
            );
            client.notify(
                handle,
                ClientEvent::Connect {
                    device_id,
                    service_index,
                },
            );
        }
    }

    /// Route a non-announce packet to the clients attached to its source.
    fn deliver(&mut self, pkt: &Packet<'_>) {
        let Some(device) = self.registry.device(pkt.device_id) else {
            return;
        };
        for &handle in device.attached() {
            let client = &mut self.clients[handle.0];
            if client.attachment.is_some_and(|a| a.service_index == pkt.service_number) {
                client.notify(handle, ClientEvent::Packet(pkt));
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Client behind `handle`; `None` for a handle minted by another core.
    pub fn client(&self, handle: ClientHandle) -> Option<&Client> {
        self.clients.get(handle.0)
    }

    /// Id of the device `handle` is attached to.
    pub fn device_id_of(&self, handle: ClientHandle) -> Option<u64> {
        let attachment = self.clients.get(handle.0)?.attachment?;
        self.registry.get(attachment.device).map(Device::id)
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }
}
