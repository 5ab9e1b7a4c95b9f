//! Client-side discovery and control core for a single-wire broadcast
//! device bus.
//!
//! Tracks which remote devices host which services, attaches local
//! clients to matching services as devices announce, restart or change,
//! and answers control-service commands about the local device.  All I/O
//! goes through the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod app;
pub mod client;
pub mod config;
pub mod control;
pub mod error;
pub mod evpipe;
pub mod packet;

pub mod adapters;

pub use app::service::BusService;
pub use error::{Error, Result};
