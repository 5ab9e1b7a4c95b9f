//! Announced service lists.
//!
//! Wire format of an announce payload (little-endian `u32` slots):
//!
//! ```text
//! ┌──────────────────────┬───────────┬───────────┬─────┬───────────┐
//! │ slot 0: flags|counter│ slot 1    │ slot 2    │ ... │ slot N    │
//! │ (counter = low 4 bit)│ class id  │ class id  │     │ class id  │
//! └──────────────────────┴───────────┴───────────┴─────┴───────────┘
//! ```
//!
//! The slot index is the service number used to address that service.

use crate::error::AnnounceError;
use crate::packet::{ANNOUNCE_COUNTER_MASK, SLOT_SIZE};

/// Service numbers are 8-bit, so at most 256 slots are addressable.
pub const MAX_SLOTS: usize = 256;

/// How a fresh announce relates to the stored list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Same slots, counter did not go backwards.
    Same,
    /// Same slots but the restart counter went backwards.
    Restarted,
    /// Slot count or at least one service class differs.
    Different,
}

/// An owned, validated service list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceList {
    slots: Vec<u32>,
}

impl ServiceList {
    /// Check that `payload` is a well-formed announce and return its slot count.
    pub fn validate(payload: &[u8]) -> Result<usize, AnnounceError> {
        let len = payload.len();
        if len < SLOT_SIZE {
            return Err(AnnounceError::TooShort { len });
        }
        if len % SLOT_SIZE != 0 {
            return Err(AnnounceError::Misaligned { len });
        }
        let slots = len / SLOT_SIZE;
        if slots > MAX_SLOTS {
            return Err(AnnounceError::TooManyServices { slots });
        }
        Ok(slots)
    }

    /// Parse an announce payload into a new list.
    ///
    /// Storage is reserved fallibly; an allocation failure is reported as
    /// [`AnnounceError::OutOfMemory`] instead of aborting.
    pub fn parse(payload: &[u8]) -> Result<Self, AnnounceError> {
        let count = Self::validate(payload)?;
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(count)
            .map_err(|_| AnnounceError::OutOfMemory)?;
        slots.extend(words(payload));
        Ok(Self { slots })
    }

    /// Compare a validated announce payload against this list.
    pub fn compare(&self, payload: &[u8]) -> Comparison {
        if payload.len() / SLOT_SIZE != self.slots.len() {
            return Comparison::Different;
        }

        let mut incoming = words(payload);
        let header = incoming.next().unwrap_or_default();
        if !self.slots[1..].iter().copied().eq(incoming) {
            return Comparison::Different;
        }
        if counter_of(header) < self.restart_counter() {
            return Comparison::Restarted;
        }
        Comparison::Same
    }

    /// Overwrite slot 0 from a payload already known to be [`Comparison::Same`].
    pub(crate) fn refresh_header(&mut self, payload: &[u8]) {
        if let Some(header) = words(payload).next() {
            self.slots[0] = header;
        }
    }

    /// Number of slots including the slot-0 header.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Raw slot 0 (restart counter and announce flags).
    pub fn header(&self) -> u32 {
        self.slots[0]
    }

    pub fn restart_counter(&self) -> u8 {
        counter_of(self.slots[0])
    }

    /// Service class hosted at `service_number`, if any.
    /// Slot 0 is the header, not a service, and yields `None`.
    pub fn service_class(&self, service_number: u8) -> Option<u32> {
        match service_number {
            0 => None,
            n => self.slots.get(n as usize).copied(),
        }
    }

    /// First service number hosting `service_class`.
    pub fn find(&self, service_class: u32) -> Option<u8> {
        self.slots
            .iter()
            .skip(1)
            .position(|&c| c == service_class)
            .map(|i| (i + 1) as u8)
    }

    /// All slots, header included.
    pub fn as_slots(&self) -> &[u32] {
        &self.slots
    }
}

fn counter_of(header: u32) -> u8 {
    (header & ANNOUNCE_COUNTER_MASK) as u8
}

fn words(payload: &[u8]) -> impl Iterator<Item = u32> + '_ {
    payload
        .chunks_exact(SLOT_SIZE)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
}
