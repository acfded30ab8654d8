//! Transport layer for XBee communication.
//!
//! This module provides the abstraction for different transport methods.
//! Currently only serial is implemented.

pub mod serial;

use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use crate::packet::Packet;

/// Trait for transport implementations.
pub trait Transport: Send + Sync {
    /// Opens the link to the module.
    fn connect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Closes the link.
    fn disconnect(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Sends a packet as a single API frame.
    fn send(&mut self, packet: &Packet) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Returns true if connected.
    fn is_connected(&self) -> bool;
}

pub use serial::{SerialConfig, SerialTransport, list_ports, run_read_loop, spawn_read_loop};
