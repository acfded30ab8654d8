//! Value types shared by all XBee frames.
//!
//! This module contains:
//! - 16-bit and 64-bit addresses
//! - AT command mnemonics
//! - Status code enumerations

pub mod address;
pub mod command;
pub mod status;

pub use address::{Address16, Address64, pretty_hex};
pub use command::AtCommand;
pub use status::{
    AtCommandStatus, DeliveryStatus, DiscoveryStatus, ModemStatus, StatusCode,
    UNKNOWN_DESCRIPTION,
};
