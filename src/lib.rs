//! # xbee
//!
//! A Rust library for the XBee API frame protocol.
//!
//! This library builds, encodes and decodes the API frames exchanged with
//! XBee radio modules over a serial line.
//!
//! ## Features
//!
//! - Typed payloads for AT commands, remote AT commands, data transmission
//!   and modem status
//! - Streaming frame decoder with resynchronisation and API escaped mode
//! - Async serial transport using Tokio
//! - Comprehensive error handling
//!
//! ## Quick Start
//!
//! ```
//! use xbee::{
//!     Address16, Address64, AtCommandStatus, FrameDecoder, OperatingMode, Packet,
//!     RemoteAtCommandResponsePacket,
//! };
//!
//! fn main() -> Result<(), xbee::Error> {
//!     let response = RemoteAtCommandResponsePacket::builder()
//!         .frame_id(1)
//!         .source_address_64(Address64::from_hex("0013A20040A04D2D")?)
//!         .source_address_16(Address16::UNKNOWN)
//!         .command("NI")
//!         .status(AtCommandStatus::Ok)
//!         .value("Router")
//!         .build()?;
//!
//!     let frame = Packet::from(response).to_frame(OperatingMode::Api)?;
//!
//!     let mut decoder = FrameDecoder::new();
//!     decoder.feed(&frame);
//!     if let Some(raw) = decoder.decode()? {
//!         println!("{}", Packet::from_raw(&raw)?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`types`] - Addresses, AT command names and status codes
//! - [`protocol`] - Frame types, frame encoding and the streaming decoder
//! - [`packet`] - Typed API payloads and the [`Packet`] sum type
//! - [`transport`] - Transport implementations (currently serial)

pub mod error;
pub mod packet;
pub mod protocol;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use error::{Error, FrameError, Result};
pub use packet::{
    ApiPayload, AtCommandPacket, AtCommandResponsePacket, FrameIdGenerator, ModemStatusPacket,
    Packet, Parameters, ReceivePacket, RemoteAtCommandPacket, RemoteAtCommandResponseBuilder,
    RemoteAtCommandResponsePacket, TransmitRequestPacket, TransmitStatusPacket,
};
pub use protocol::{FrameDecoder, FrameType, OperatingMode, RawFrame};
pub use transport::{SerialConfig, SerialTransport, Transport, list_ports};
pub use types::{
    Address16, Address64, AtCommand, AtCommandStatus, DeliveryStatus, DiscoveryStatus,
    ModemStatus, StatusCode,
};
