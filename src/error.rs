//! Unified error types for the bus client core.
//!
//! A single `Error` enum that every subsystem converts into, with one
//! `Copy` enum per subsystem.  Malformed bus input is expected noise on a
//! broadcast medium: these errors are logged and dropped by the dispatcher,
//! never reported back onto the wire.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An announce packet was rejected.
    Announce(AnnounceError),
    /// A pipe subscription request was rejected.
    Pipe(PipeError),
    /// The external transmit collaborator refused a frame.
    Transmit(TransmitError),
    /// Configuration is invalid or could not be parsed.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Announce(e) => write!(f, "announce: {e}"),
            Self::Pipe(e) => write!(f, "pipe: {e}"),
            Self::Transmit(e) => write!(f, "transmit: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Announce errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnounceError {
    /// Payload is shorter than the slot-0 header.
    TooShort { len: usize },
    /// Payload is not a whole number of 32-bit slots.
    Misaligned { len: usize },
    /// More slots than an 8-bit service number can address.
    TooManyServices { slots: usize },
    /// Storage for the new service list could not be reserved.
    OutOfMemory,
}

impl fmt::Display for AnnounceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len } => write!(f, "payload too short ({len} bytes)"),
            Self::Misaligned { len } => write!(f, "payload not slot-aligned ({len} bytes)"),
            Self::TooManyServices { slots } => write!(f, "too many service slots ({slots})"),
            Self::OutOfMemory => write!(f, "out of memory for service list"),
        }
    }
}

impl From<AnnounceError> for Error {
    fn from(e: AnnounceError) -> Self {
        Self::Announce(e)
    }
}

// ---------------------------------------------------------------------------
// Pipe errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeError {
    /// Request payload is shorter than the fixed subscription record.
    TooShort { len: usize },
}

impl fmt::Display for PipeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len } => write!(f, "request too short ({len} bytes)"),
        }
    }
}

impl From<PipeError> for Error {
    fn from(e: PipeError) -> Self {
        Self::Pipe(e)
    }
}

// ---------------------------------------------------------------------------
// Transmit errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitError {
    /// The outbound queue has no room for another frame.
    QueueFull,
    /// Payload exceeds the maximum frame payload.
    PayloadTooLarge,
}

impl fmt::Display for TransmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull => write!(f, "transmit queue full"),
            Self::PayloadTooLarge => write!(f, "payload too large"),
        }
    }
}

impl From<TransmitError> for Error {
    fn from(e: TransmitError) -> Self {
        Self::Transmit(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Input could not be deserialized.
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed config"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
